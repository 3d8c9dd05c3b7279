use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::redirect;
use tokio::time::sleep;

use crate::runner::ProbeError;

/// Browser signatures rotated across requests so the probe does not
/// present a single static client fingerprint.
pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.2 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Firefox/89.0",
];

/// Statuses suppressed from output when filtering is enabled.
pub const NOISE_STATUS: [u16; 3] = [403, 404, 429];

pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// the outcome of probing one target, consumed immediately by the reporter
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    Found { url: String },
    Checked { url: String, status: u16 },
    Filtered { url: String, status: u16 },
    Failed { url: String, error: String },
}

impl ProbeOutcome {
    pub fn url(&self) -> &str {
        match self {
            ProbeOutcome::Found { url }
            | ProbeOutcome::Checked { url, .. }
            | ProbeOutcome::Filtered { url, .. }
            | ProbeOutcome::Failed { url, .. } => url,
        }
    }
}

/// Maps a response status to its outcome. A 200 is always a find, the
/// noise statuses disappear only when filtering is enabled, everything
/// else is reported as checked.
pub fn classify(url: String, status: u16, filter_errors: bool) -> ProbeOutcome {
    if status == 200 {
        ProbeOutcome::Found { url }
    } else if filter_errors && NOISE_STATUS.contains(&status) {
        ProbeOutcome::Filtered { url, status }
    } else {
        ProbeOutcome::Checked { url, status }
    }
}

#[derive(Clone, Debug)]
pub struct Prober {
    client: reqwest::Client,
    filter_errors: bool,
    delay: Duration,
    user_agents: Vec<String>,
}

impl Prober {
    pub fn new(filter_errors: bool, delay: f64) -> Result<Self, ProbeError> {
        //no certs
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .danger_accept_invalid_hostnames(true)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|source| ProbeError::HttpClientBuild { source })?;
        Ok(Self {
            client,
            filter_errors,
            delay: Duration::try_from_secs_f64(delay).unwrap_or(Duration::ZERO),
            user_agents: USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        })
    }

    /// Replaces the rotation pool; an empty list keeps the default pool.
    pub fn with_user_agents(mut self, user_agents: Vec<String>) -> Self {
        if !user_agents.is_empty() {
            self.user_agents = user_agents;
        }
        self
    }

    fn pick_user_agent(&self) -> String {
        let mut rng = rand::thread_rng();
        self.user_agents
            .choose(&mut rng)
            .cloned()
            .unwrap_or_default()
    }

    /// Issues a single GET against the target and classifies the response.
    /// Transport failures never escape this boundary: they come back as
    /// `Failed`. The configured delay then suspends this worker only, so
    /// with N workers and delay D the aggregate request rate approaches
    /// N/D, not 1/D.
    pub async fn probe(&self, target: String) -> ProbeOutcome {
        let request = self
            .client
            .get(&target)
            .header(reqwest::header::USER_AGENT, self.pick_user_agent());
        let outcome = match request.send().await {
            Ok(response) => classify(target, response.status().as_u16(), self.filter_errors),
            Err(e) => ProbeOutcome::Failed {
                url: target,
                error: e.to_string(),
            },
        };
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        outcome
    }
}
