//! Remote move advisors.
//!
//! The session asks an [`Advisor`] for exactly one move per human move and
//! never retries. Every way a request can go wrong comes back as an
//! [`AdvisorError`]; it is up to the caller to decide what that means for the turn.
//!
//! Two implementations ship with the crate:
//!
//! - [`HttpAdvisor`] posts the position as `{"fen": ...}` to a chess-api.com
//!   style endpoint and reads the `move` field of the JSON reply.
//! - [`RandomAdvisor`] plays a random legal move locally, for offline use.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::position::Position;
use crate::uci::UciMove;

pub trait Advisor {
    /// Suggests a move for the side to move in `fen`.
    fn request_move(&mut self, fen: &str) -> Result<UciMove, AdvisorError>;
}

impl<A: Advisor + ?Sized> Advisor for Box<A> {
    fn request_move(&mut self, fen: &str) -> Result<UciMove, AdvisorError> {
        (**self).request_move(fen)
    }
}

#[derive(Debug, Serialize)]
struct AdviceRequest<'a> {
    fen: &'a str,
}

#[derive(Debug, Deserialize)]
struct AdviceReply {
    #[serde(rename = "move")]
    mv: Option<String>,
}

/// Extracts the suggested move from a JSON reply body.
pub fn parse_reply(body: &str) -> Result<UciMove, AdvisorError> {
    let reply: AdviceReply =
        serde_json::from_str(body).map_err(|e| AdvisorError::Malformed(e.to_string()))?;
    let text = reply.mv.ok_or(AdvisorError::MissingMove)?;
    text.parse::<UciMove>()
        .map_err(|source| AdvisorError::InvalidNotation { text, source })
}

pub struct HttpAdvisor {
    client: Client,
    config: AdvisorConfig,
}

impl HttpAdvisor {
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AdvisorError::Transport)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    fn transport_error(&self, error: reqwest::Error) -> AdvisorError {
        if error.is_timeout() {
            AdvisorError::Timeout(self.config.timeout)
        } else {
            AdvisorError::Transport(error)
        }
    }
}

impl Advisor for HttpAdvisor {
    fn request_move(&mut self, fen: &str) -> Result<UciMove, AdvisorError> {
        debug!(endpoint = %self.config.endpoint, %fen, "requesting advisor move");

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&AdviceRequest { fen })
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "advisor rejected request");
            return Err(AdvisorError::Status(status.as_u16()));
        }

        let body = response.text().map_err(|e| self.transport_error(e))?;
        parse_reply(&body)
    }
}

/// Plays a uniformly random legal move. Never fails on a position with moves.
pub struct RandomAdvisor {
    rng: StdRng,
}

impl RandomAdvisor {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Advisor for RandomAdvisor {
    fn request_move(&mut self, fen: &str) -> Result<UciMove, AdvisorError> {
        let position = Position::from_fen(fen).map_err(|e| AdvisorError::Malformed(e.to_string()))?;
        position
            .legal_moves()
            .choose(&mut self.rng)
            .map(|mv| mv.to_uci())
            .ok_or(AdvisorError::MissingMove)
    }
}
