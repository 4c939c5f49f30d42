// SPDX-License-Identifier: MIT

//! Engine-wide tunables, loaded from environment variables with hard-coded
//! defaults (spec §6). Thin env-var struct, not a config file format —
//! matches the daemon's own `env.rs` convention.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Overall Supervisor escalation timeout (spec §4.6 default: 90s).
    pub supervisor_timeout: Duration,
    /// Registration freshness window (spec §4.6 default: 60s).
    pub registration_freshness: Duration,
    /// Activity Monitor poll interval.
    pub activity_poll_interval: Duration,
    /// Lines captured per Activity Monitor poll (spec §4.7 default: 50).
    pub activity_capture_lines: u32,
    /// Default check-in cadence per non-exempt role (spec §4.9).
    pub default_checkin_minutes: u64,
    /// Max concurrent session creations per Supervisor batch (spec §4.6: 2).
    pub batch_size: usize,
    /// Delay between Supervisor batches (spec §4.6: 1s).
    pub batch_gap: Duration,
    /// File-gated TPM workflow (spec §4.8), disabled by default.
    pub enable_file_gated_tpm_workflow: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            supervisor_timeout: Duration::from_secs(90),
            registration_freshness: Duration::from_secs(60),
            activity_poll_interval: Duration::from_secs(10),
            activity_capture_lines: 50,
            default_checkin_minutes: 30,
            batch_size: 2,
            batch_gap: Duration::from_secs(1),
            enable_file_gated_tpm_workflow: false,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_u64("AGENTMUX_CHECKIN_MINUTES") {
            config.default_checkin_minutes = v;
        }
        if let Ok(v) = std::env::var("AGENTMUX_ENABLE_TPM_WORKFLOW") {
            config.enable_file_gated_tpm_workflow = v == "1" || v.eq_ignore_ascii_case("true");
        }
        config
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
