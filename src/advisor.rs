//! Advisor client: asks a local Ollama-compatible LLM for lifestyle tips, with templated fallback.

use crate::config::AdvisorConfig;
use crate::risk::RiskTier;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Replies at or under this many characters are treated as empty.
const MIN_REPLY_CHARS: usize = 20;
const MAX_REPLY_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("advisor returned HTTP {0}")]
    Status(u16),

    #[error("advisor reply too short ({0} chars)")]
    ShortReply(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollutionBand {
    Low,
    Moderate,
    High,
}

impl PollutionBand {
    pub fn classify(pm25: f64, no2: f64) -> Self {
        if pm25 > 15.0 || no2 > 50.0 {
            PollutionBand::High
        } else if pm25 > 10.0 || no2 > 40.0 {
            PollutionBand::Moderate
        } else {
            PollutionBand::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PollutionBand::Low => "low",
            PollutionBand::Moderate => "moderate",
            PollutionBand::High => "high",
        }
    }
}

/// What the prompt is built from.
#[derive(Debug, Clone, Copy)]
pub struct AdviceContext<'a> {
    pub age: Option<u32>,
    pub borough: &'a str,
    pub pm25: f64,
    pub no2: f64,
    pub tier: RiskTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub text: String,
    /// True when `text` came from the LLM rather than the templates
    pub generated: bool,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

pub fn build_prompt(ctx: &AdviceContext<'_>) -> String {
    let age = ctx
        .age
        .map_or_else(|| "unknown".to_string(), |a| a.to_string());
    let band = PollutionBand::classify(ctx.pm25, ctx.no2);
    format!(
        "You are a friendly health and environment advisor for London residents.\n\
         Profile:\n\
         - Age: {age}\n\
         - Borough: {borough}\n\
         - Air Quality: PM2.5 = {pm25:.1} μg/m³, NO2 = {no2:.1} μg/m³ ({band} pollution)\n\
         - Cardiovascular risk: {tier}\n\n\
         Please give 3 practical, encouraging tips to help this person reduce their cardiovascular risk and stay healthy, \
         focusing on environmental and lifestyle actions they can take in London. \
         Do not provide medical advice or disclaimers, just helpful, everyday suggestions.",
        borough = ctx.borough,
        pm25 = ctx.pm25,
        no2 = ctx.no2,
        band = band.as_str(),
        tier = ctx.tier.label().to_lowercase(),
    )
}

/// Trim, then cap at 500 characters with a trailing `...`.
pub fn clean_response(reply: &str) -> String {
    let reply = reply.trim();
    if reply.chars().count() > MAX_REPLY_CHARS {
        let mut cut: String = reply.chars().take(MAX_REPLY_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        reply.to_string()
    }
}

/// Three numbered tips per tier, used when the LLM cannot answer.
pub fn numbered_fallback(tier: RiskTier, borough: &str) -> String {
    match tier {
        RiskTier::VeryLow | RiskTier::Low => format!(
            "1. Continue your healthy lifestyle while being mindful of air quality in {borough}. \
             2. Exercise in London's green spaces like Hyde Park or Hampstead Heath when possible. \
             3. Monitor London Air Quality app before outdoor activities and maintain regular check-ups."
        ),
        RiskTier::Moderate => format!(
            "1. Exercise indoors or in parks when air pollution is high in {borough}. \
             2. Consider cycling on London's Cycle Superhighways to avoid traffic pollution. \
             3. Increase cardiovascular exercise while avoiding busy roads during peak hours."
        ),
        RiskTier::High | RiskTier::VeryHigh => format!(
            "1. Limit outdoor exercise when PM2.5 > 15 μg/m³ in {borough}. \
             2. Consult your GP about air pollution's impact on your cardiovascular health. \
             3. Use air purifiers at home and consider relocation if air quality is consistently poor."
        ),
    }
}

pub struct AdvisorClient {
    config: AdvisorConfig,
    client: reqwest::blocking::Client,
    base_url: String,
}

impl AdvisorClient {
    /// `None` if the HTTP client cannot be built.
    pub fn new(config: &AdvisorConfig) -> Option<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(5)))
            .build()
            .ok()?;
        Some(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            config: config.clone(),
            client,
        })
    }

    /// One non-streaming completion; the trimmed `response` field on success.
    pub fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                num_predict: self.config.max_tokens,
            },
        };
        debug!(model = %self.config.model, "querying advisor");
        let res = self.client.post(&url).json(&body).send()?;
        if !res.status().is_success() {
            return Err(AdvisorError::Status(res.status().as_u16()));
        }
        let reply: GenerateResponse = res.json()?;
        let text = reply.response.trim().to_string();
        let len = text.chars().count();
        if len <= MIN_REPLY_CHARS {
            return Err(AdvisorError::ShortReply(len));
        }
        Ok(text)
    }

    /// Server reachable and the configured model is installed.
    pub fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        let tags = match self.client.get(&url).send() {
            Ok(res) if res.status().is_success() => res.json::<TagsResponse>(),
            Ok(res) => {
                debug!(status = res.status().as_u16(), "advisor availability check rejected");
                return false;
            }
            Err(e) => {
                debug!(error = %e, "advisor unreachable");
                return false;
            }
        };
        match tags {
            Ok(tags) => tags.models.iter().any(|m| m.name == self.config.model),
            Err(_) => false,
        }
    }

    /// LLM advice for `ctx`, or the numbered template if the request fails in any way.
    pub fn advise(&self, ctx: &AdviceContext<'_>) -> Advice {
        match self.generate(&build_prompt(ctx)) {
            Ok(reply) => {
                info!(borough = ctx.borough, tier = %ctx.tier, "advisor reply received");
                Advice {
                    text: clean_response(&reply),
                    generated: true,
                }
            }
            Err(e) => {
                warn!(error = %e, "advisor failed, using template advice");
                Advice {
                    text: numbered_fallback(ctx.tier, ctx.borough),
                    generated: false,
                }
            }
        }
    }
}
