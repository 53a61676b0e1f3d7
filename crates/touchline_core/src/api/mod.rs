pub mod match_json;

pub use match_json::{
    replay_script_json, snapshot, snapshot_json, snapshot_with, summary, ClockView, MatchScript,
    MatchSnapshot, MatchSummary, PlayerSummary, RosterRow,
};
