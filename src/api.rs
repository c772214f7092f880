use anyhow::{Context, Result, anyhow};
use reqwest::Url;
use reqwest::blocking::Response;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::http_client::http_client;
use crate::state::{LastMatch, PredictionResult, RecentMatch, TeamStats};

/// The remote statistics/prediction service. Every method is one request;
/// any failure is reported as `Err` without distinguishing its cause.
pub trait StatsApi: Send + Sync {
    fn teams(&self) -> Result<Vec<String>>;
    fn team_stats(&self, team: &str) -> Result<TeamStats>;
    fn recent_matches(&self, team: &str) -> Result<Vec<RecentMatch>>;
    fn predict(&self, team1: &str, team2: &str) -> Result<PredictionResult>;
    fn last_match(&self, team1: &str, team2: &str) -> Result<LastMatch>;
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    team1: &'a str,
    team2: &'a str,
}

pub struct HttpStatsApi {
    base: Url,
}

impl HttpStatsApi {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = endpoint_url(&self.base, segments)?;
        let resp = http_client()?
            .get(url.clone())
            .send()
            .with_context(|| format!("GET {url} failed"))?;
        read_json(resp, &url)
    }
}

impl StatsApi for HttpStatsApi {
    fn teams(&self) -> Result<Vec<String>> {
        self.get_json(&["teams"])
    }

    fn team_stats(&self, team: &str) -> Result<TeamStats> {
        self.get_json(&["team_stats", team])
    }

    fn recent_matches(&self, team: &str) -> Result<Vec<RecentMatch>> {
        self.get_json(&["recent_matches", team])
    }

    fn predict(&self, team1: &str, team2: &str) -> Result<PredictionResult> {
        let url = endpoint_url(&self.base, &["predict"])?;
        let resp = http_client()?
            .post(url.clone())
            .json(&PredictRequest { team1, team2 })
            .send()
            .with_context(|| format!("POST {url} failed"))?;
        read_json(resp, &url)
    }

    fn last_match(&self, team1: &str, team2: &str) -> Result<LastMatch> {
        self.get_json(&["last_match", team1, team2])
    }
}

fn read_json<T: DeserializeOwned>(resp: Response, url: &Url) -> Result<T> {
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status} from {url}: {}", body.trim()));
    }
    serde_json::from_str(&body).with_context(|| format!("invalid json from {url}"))
}

/// Appends percent-encoded path segments to `base`.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| anyhow!("base url cannot have a path: {base}"))?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}

pub fn parse_teams_json(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).context("invalid teams json")
}

pub fn parse_team_stats_json(raw: &str) -> Result<TeamStats> {
    serde_json::from_str(raw).context("invalid team_stats json")
}

pub fn parse_recent_matches_json(raw: &str) -> Result<Vec<RecentMatch>> {
    serde_json::from_str(raw).context("invalid recent_matches json")
}

pub fn parse_prediction_json(raw: &str) -> Result<PredictionResult> {
    serde_json::from_str(raw).context("invalid predict json")
}

pub fn parse_last_match_json(raw: &str) -> Result<LastMatch> {
    serde_json::from_str(raw).context("invalid last_match json")
}
