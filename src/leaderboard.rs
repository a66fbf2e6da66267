//! On-chain leaderboard view and score submission
//!
//! The ledger contract and the read-through HTTP API live outside this crate.
//! Here are their wire types, the ranking the API applies, display helpers,
//! and the narrow [`ScoreSubmitter`] seam the game hands final scores to.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted player name (characters)
pub const MAX_NAME_LEN: usize = 32;

/// Leaderboard read endpoint served next to the game
pub const LEADERBOARD_URL: &str = "/api/leaderboard";

/// How often the browser host refreshes the leaderboard (ms)
pub const REFRESH_INTERVAL_MS: i32 = 30_000;

/// Failures reading the leaderboard
#[derive(Debug, Error, PartialEq)]
pub enum LeaderboardError {
    #[error("leaderboard request failed: {0}")]
    Transport(String),
    #[error("malformed leaderboard response: {0}")]
    Decode(String),
    #[error("leaderboard service error: {0}")]
    Service(String),
}

/// Failures submitting a score
#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("player name is empty")]
    EmptyName,
    #[error("player name is longer than {} characters", MAX_NAME_LEN)]
    NameTooLong,
    #[error("no wallet connected")]
    NoWallet,
    #[error("submission rejected: {0}")]
    Rejected(String),
}

/// One ranked row as served by the leaderboard API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: u32,
    /// Wallet address of the player
    pub address: String,
    pub name: String,
    pub score: u64,
    /// Unix seconds of the on-chain write
    pub timestamp: u64,
}

/// `GET /api/leaderboard` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub success: bool,
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LeaderboardResponse {
    pub fn from_json(json: &str) -> Result<Self, LeaderboardError> {
        serde_json::from_str(json).map_err(|e| LeaderboardError::Decode(e.to_string()))
    }

    /// Entries on success, the service's message otherwise
    pub fn into_entries(self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        if self.success {
            Ok(self.leaderboard)
        } else {
            Err(LeaderboardError::Service(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

/// A row as the ledger contract stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    pub player_address: String,
    pub player_name: String,
    pub high_score: u64,
    pub timestamp: u64,
}

/// Ranks follow ledger order, starting at 1
pub fn rank_records(records: Vec<LedgerRecord>) -> Vec<LeaderboardEntry> {
    records
        .into_iter()
        .zip(1..)
        .map(|(r, rank)| LeaderboardEntry {
            rank,
            address: r.player_address,
            name: r.player_name,
            score: r.high_score,
            timestamp: r.timestamp,
        })
        .collect()
}

/// `0x1234...abcd` form; short strings pass through
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// CSS class for the top three rows (0-based index)
pub fn podium_class(index: usize) -> &'static str {
    match index {
        0 => "gold",
        1 => "silver",
        2 => "bronze",
        _ => "",
    }
}

/// Relative age of a ledger timestamp, both in unix seconds
pub fn format_relative(now: u64, timestamp: u64) -> String {
    let diff_secs = now.saturating_sub(timestamp);
    let diff_mins = diff_secs / 60;
    let diff_hours = diff_mins / 60;
    let diff_days = diff_hours / 24;

    if diff_days >= 1 {
        if diff_days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", diff_days)
        }
    } else if diff_hours >= 1 {
        if diff_hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", diff_hours)
        }
    } else if diff_mins >= 1 {
        if diff_mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", diff_mins)
        }
    } else {
        "Just now".to_string()
    }
}

/// Escape text for insertion into HTML
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Markup for the leaderboard panel; `now` is unix seconds for the age column
pub fn leaderboard_html(entries: &[LeaderboardEntry], now: u64) -> String {
    if entries.is_empty() {
        return r#"<div class="loading">No scores yet. Be the first!</div>"#.to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                r##"<div class="leaderboard-entry {}"><span class="rank">#{}</span><div class="player-info"><span class="player-name">{}</span><span class="player-address">{}</span></div><span class="player-score">{}</span><span class="player-time">{}</span></div>"##,
                podium_class(i),
                e.rank,
                escape_html(&e.name),
                escape_html(&truncate_address(&e.address)),
                e.score,
                format_relative(now, e.timestamp)
            )
        })
        .collect()
}

/// A validated `(score, playerName)` pair ready for the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub score: u64,
    pub player_name: String,
}

impl ScoreSubmission {
    /// Trims the name; rejects empty or overlong names
    pub fn new(score: u64, player_name: &str) -> Result<Self, SubmitError> {
        let name = player_name.trim();
        if name.is_empty() {
            return Err(SubmitError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(SubmitError::NameTooLong);
        }
        Ok(Self {
            score,
            player_name: name.to_string(),
        })
    }
}

/// Where final scores go. Implementations may fail independently of the game.
pub trait ScoreSubmitter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmitError>;
}

/// Keeps every submission in memory in arrival order
#[derive(Debug, Clone, Default)]
pub struct MemorySubmitter {
    pub submissions: Vec<ScoreSubmission>,
}

impl MemorySubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score per player, highest first, ranked like the API
    pub fn leaderboard(&self, timestamp: u64) -> Vec<LeaderboardEntry> {
        let mut best: Vec<&ScoreSubmission> = Vec::new();
        for s in &self.submissions {
            match best.iter().position(|b| b.player_name == s.player_name) {
                Some(i) if s.score > best[i].score => best[i] = s,
                Some(_) => {}
                None => best.push(s),
            }
        }
        best.sort_by(|a, b| b.score.cmp(&a.score));
        rank_records(
            best.into_iter()
                .map(|s| LedgerRecord {
                    player_address: String::new(),
                    player_name: s.player_name.clone(),
                    high_score: s.score,
                    timestamp,
                })
                .collect(),
        )
    }
}

impl ScoreSubmitter for MemorySubmitter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmitError> {
        log::info!(
            "Recorded score {} for {}",
            submission.score,
            submission.player_name
        );
        self.submissions.push(submission.clone());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::*;

    // The page owns the wallet; it exposes a promise-returning hook.
    #[wasm_bindgen(inline_js = "
        export function submit_score_js(score, name) {
            if (typeof window.submitScore !== 'function') {
                return Promise.reject(new Error('no wallet connected'));
            }
            return window.submitScore(score, name);
        }
    ")]
    extern "C" {
        #[wasm_bindgen(catch)]
        fn submit_score_js(score: f64, name: &str) -> Result<js_sys::Promise, JsValue>;
    }

    fn js_message(value: &JsValue) -> String {
        value
            .dyn_ref::<js_sys::Error>()
            .map(|e| String::from(e.message()))
            .or_else(|| value.as_string())
            .unwrap_or_else(|| format!("{:?}", value))
    }

    /// Fetch and decode the ranked leaderboard
    pub async fn fetch_leaderboard(url: &str) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::SameOrigin);

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|e| LeaderboardError::Transport(js_message(&e)))?;
        let window = web_sys::window()
            .ok_or_else(|| LeaderboardError::Transport("no window".to_string()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| LeaderboardError::Transport(js_message(&e)))?
            .dyn_into()
            .map_err(|e| LeaderboardError::Transport(js_message(&e)))?;

        let text = JsFuture::from(
            response
                .text()
                .map_err(|e| LeaderboardError::Transport(js_message(&e)))?,
        )
        .await
        .map_err(|e| LeaderboardError::Transport(js_message(&e)))?
        .as_string()
        .unwrap_or_default();

        LeaderboardResponse::from_json(&text)?.into_entries()
    }

    /// Hand a submission to the page's wallet hook and wait for confirmation
    pub async fn submit_to_ledger(submission: &ScoreSubmission) -> Result<(), SubmitError> {
        let promise = submit_score_js(submission.score as f64, &submission.player_name)
            .map_err(|e| SubmitError::Rejected(js_message(&e)))?;
        JsFuture::from(promise).await.map_err(|e| {
            let message = js_message(&e);
            if message.contains("no wallet") {
                SubmitError::NoWallet
            } else {
                SubmitError::Rejected(message)
            }
        })?;
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{fetch_leaderboard, submit_to_ledger};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leaderboard_response() {
        let json = r#"{"success":true,"leaderboard":[
            {"rank":1,"address":"0xAbCdEf0123456789","name":"ada","score":42,"timestamp":1700000000},
            {"rank":2,"address":"0x9999888877776666","name":"bo","score":17,"timestamp":1700000500}
        ]}"#;
        let entries = LeaderboardResponse::from_json(json)
            .unwrap()
            .into_entries()
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "ada");
        assert_eq!(entries[1].rank, 2);
    }

    #[test]
    fn test_service_failure_is_error() {
        let json = r#"{"success":false,"error":"rpc down"}"#;
        let result = LeaderboardResponse::from_json(json).unwrap().into_entries();
        assert_eq!(result, Err(LeaderboardError::Service("rpc down".to_string())));
        assert!(matches!(
            LeaderboardResponse::from_json("<html>"),
            Err(LeaderboardError::Decode(_))
        ));
    }

    #[test]
    fn test_rank_records_in_ledger_order() {
        let records = vec![
            LedgerRecord {
                player_address: "0xa".into(),
                player_name: "a".into(),
                high_score: 5,
                timestamp: 1,
            },
            LedgerRecord {
                player_address: "0xb".into(),
                player_name: "b".into(),
                high_score: 9,
                timestamp: 2,
            },
        ];
        let ranked = rank_records(records);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].address, "0xa");
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[1].score, 9);
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(
            truncate_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
        assert_eq!(truncate_address("0x12"), "0x12");
    }

    #[test]
    fn test_podium_class() {
        assert_eq!(podium_class(0), "gold");
        assert_eq!(podium_class(1), "silver");
        assert_eq!(podium_class(2), "bronze");
        assert_eq!(podium_class(3), "");
    }

    #[test]
    fn test_format_relative() {
        let now = 1_000_000;
        assert_eq!(format_relative(now, now - 10), "Just now");
        assert_eq!(format_relative(now, now - 60), "1 min ago");
        assert_eq!(format_relative(now, now - 300), "5 mins ago");
        assert_eq!(format_relative(now, now - 3600), "1 hour ago");
        assert_eq!(format_relative(now, now - 3 * 3600), "3 hours ago");
        assert_eq!(format_relative(now, now - 86_400), "Yesterday");
        assert_eq!(format_relative(now, now - 4 * 86_400), "4 days ago");
        // Clock skew
        assert_eq!(format_relative(now, now + 50), "Just now");
    }

    #[test]
    fn test_leaderboard_html_escapes_names() {
        assert!(leaderboard_html(&[], 0).contains("No scores yet"));
        let entries = vec![LeaderboardEntry {
            rank: 1,
            address: "0x1234567890abcdef1234".into(),
            name: "<b>ada</b>".into(),
            score: 8,
            timestamp: 1_700_000_000,
        }];
        let html = leaderboard_html(&entries, 1_700_000_000 + 2 * 3600);
        assert!(html.contains("leaderboard-entry gold"));
        assert!(html.contains("&lt;b&gt;ada&lt;/b&gt;"));
        assert!(html.contains("0x1234...1234"));
        assert!(!html.contains("<b>"));
        assert!(html.contains(r#"<span class="player-time">2 hours ago</span>"#));
    }

    #[test]
    fn test_submission_validates_name() {
        assert_eq!(
            ScoreSubmission::new(3, "  ada  ").unwrap().player_name,
            "ada"
        );
        assert_eq!(ScoreSubmission::new(3, "   "), Err(SubmitError::EmptyName));
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(ScoreSubmission::new(3, &long), Err(SubmitError::NameTooLong));
    }

    #[test]
    fn test_memory_submitter_keeps_best_per_player() {
        let mut sink = MemorySubmitter::new();
        for (score, name) in [(4, "ada"), (9, "bo"), (11, "ada"), (2, "bo")] {
            sink.submit(&ScoreSubmission::new(score, name).unwrap())
                .unwrap();
        }
        assert_eq!(sink.submissions.len(), 4);
        assert_eq!(sink.submissions[2].score, 11);
        let board = sink.leaderboard(0);
        assert_eq!(board.len(), 2);
        assert_eq!((board[0].name.as_str(), board[0].score), ("ada", 11));
        assert_eq!((board[1].name.as_str(), board[1].score), ("bo", 9));
        assert_eq!(board[1].rank, 2);
    }
}
