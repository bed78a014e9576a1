//! # Feature: Pomodoro
//!
//! Group focus sessions: members join with a reaction, then the bot runs
//! work and break phases with a live countdown until the cycles are done or
//! a participant presses Stop.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.1.0: Countdown edits throttled to one every few seconds
//! - 1.0.0: Initial release

use anyhow::Result;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{error, info, warn};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::http::Http;
use serenity::model::application::component::ButtonStyle;
use serenity::model::channel::ReactionType;
use serenity::model::id::ChannelId;
use serenity::utils::Colour;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::embeds::BLURPLE;

pub const JOIN_WINDOW: Duration = Duration::from_secs(30);
pub const TICK: Duration = Duration::from_secs(5);
pub const STOP_BUTTON_ID: &str = "pomodoro:stop";
pub const JOIN_EMOJI: char = '✅';

pub const DEFAULT_FOCUS_MINUTES: f64 = 25.0;
pub const DEFAULT_BREAK_MINUTES: f64 = 5.0;
pub const DEFAULT_CYCLES: i64 = 4;
const MAX_PHASE_MINUTES: f64 = 180.0;
const MAX_CYCLES: i64 = 12;

const WORK_GIF: &str = "https://i.giphy.com/6XX4V0O8a0xdS.webp";
const PHASE_COLOUR: Colour = Colour(0x43b581);

pub const ALREADY_RUNNING: &str = "A Pomodoro session is already running in this channel.";
pub const NOBODY_JOINED: &str = "No one joined the Pomodoro session. Cancelled.";
pub const COMPLETE: &str = "🎉 Pomodoro session complete! Great job!";
pub const STOPPED: &str = "🛑 Pomodoro session stopped.";
pub const NOT_PARTICIPANT: &str = "Only participants can stop this session.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Work,
    Break,
}

impl PhaseKind {
    fn name(&self) -> &'static str {
        match self {
            PhaseKind::Work => "Work",
            PhaseKind::Break => "Break",
        }
    }

    fn blurb(&self) -> &'static str {
        match self {
            PhaseKind::Work => "**Focus Time!**\nAlmost there, keep pushing! 🔥",
            PhaseKind::Break => "**Break Time!**\nRelax and recharge! 😌",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub cycle: u32,
    pub kind: PhaseKind,
    pub seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroPlan {
    pub focus_secs: u64,
    pub break_secs: u64,
    pub cycles: u32,
}

impl PomodoroPlan {
    /// Minutes may be fractional; each phase must be at least one second.
    pub fn from_minutes(focus: f64, brk: f64, cycles: i64) -> Result<Self, String> {
        if !(focus > 0.0 && focus <= MAX_PHASE_MINUTES) || !(brk > 0.0 && brk <= MAX_PHASE_MINUTES) {
            return Err(format!(
                "❌ Focus and break times must be between 0 and {} minutes.",
                MAX_PHASE_MINUTES
            ));
        }
        if !(1..=MAX_CYCLES).contains(&cycles) {
            return Err(format!("❌ Cycles must be between 1 and {}.", MAX_CYCLES));
        }
        let focus_secs = (focus * 60.0) as u64;
        let break_secs = (brk * 60.0) as u64;
        if focus_secs == 0 || break_secs == 0 {
            return Err("❌ Each phase must last at least one second.".to_string());
        }
        Ok(PomodoroPlan {
            focus_secs,
            break_secs,
            cycles: cycles as u32,
        })
    }

    /// Work then break per cycle, with no break after the last work phase.
    pub fn phases(&self) -> Vec<Phase> {
        let mut phases = Vec::with_capacity(self.cycles as usize * 2);
        for cycle in 1..=self.cycles {
            phases.push(Phase {
                cycle,
                kind: PhaseKind::Work,
                seconds: self.focus_secs,
            });
            if cycle < self.cycles {
                phases.push(Phase {
                    cycle,
                    kind: PhaseKind::Break,
                    seconds: self.break_secs,
                });
            }
        }
        phases
    }
}

/// A reserved channel slot that has not been handed to a running session yet.
pub struct SessionClaim<'a> {
    sessions: &'a PomodoroSessions,
    channel_id: u64,
    state: Arc<SessionState>,
    armed: bool,
}

impl SessionClaim<'_> {
    pub fn keep(mut self) -> Arc<SessionState> {
        self.armed = false;
        Arc::clone(&self.state)
    }
}

impl Drop for SessionClaim<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.sessions.finish(self.channel_id);
        }
    }
}

pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Whole minutes print bare; anything else gets one decimal.
pub fn format_minutes(seconds: u64) -> String {
    if seconds % 60 == 0 {
        (seconds / 60).to_string()
    } else {
        format!("{:.1}", seconds as f64 / 60.0)
    }
}

pub fn join_embed(plan: &PomodoroPlan) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("🍅 Pomodoro Session Starting!")
        .description(format!(
            "React with ✅ to join!\nSession: **{} min focus**, **{} min break**, {} cycles.\n_You have 30 seconds to join!_",
            format_minutes(plan.focus_secs),
            format_minutes(plan.break_secs),
            plan.cycles
        ))
        .colour(BLURPLE);
    embed
}

pub fn phase_embed(phase: &Phase, total_cycles: u32, remaining: Option<u64>) -> CreateEmbed {
    let mut description = phase.kind.blurb().to_string();
    if let Some(remaining) = remaining {
        description.push_str(&format!("\n\n`{}`", format_clock(remaining)));
    }

    let mut embed = CreateEmbed::default();
    embed
        .title(format!(
            "🔔 Cycle {}/{} — {}!",
            phase.cycle,
            total_cycles,
            phase.kind.name()
        ))
        .description(description)
        .colour(PHASE_COLOUR);
    if phase.kind == PhaseKind::Work {
        embed.image(WORK_GIF);
    }
    embed
}

pub fn stop_components() -> CreateComponents {
    let mut components = CreateComponents::default();
    components.create_action_row(|row| {
        row.create_button(|b| {
            b.custom_id(STOP_BUTTON_ID)
                .label("Stop Session")
                .style(ButtonStyle::Danger)
        })
    });
    components
}

#[derive(Default)]
pub struct SessionState {
    participants: Mutex<HashSet<u64>>,
    stopped: AtomicBool,
    stop_signal: Notify,
}

impl SessionState {
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn set_participants(&self, users: impl IntoIterator<Item = u64>) {
        if let Ok(mut participants) = self.participants.lock() {
            participants.extend(users);
        }
    }

    fn is_participant(&self, user_id: u64) -> bool {
        self.participants
            .lock()
            .map(|p| p.contains(&user_id))
            .unwrap_or(false)
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.stop_signal.notify_waiters();
    }

    /// Sleeps for `duration`, returning early (false) when stopped.
    async fn wait(&self, duration: Duration) -> bool {
        if self.is_stopped() {
            return false;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => !self.is_stopped(),
            _ = self.stop_signal.notified() => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    NotRunning,
    NotParticipant,
    Stopped,
}

/// One session per channel.
#[derive(Clone, Default)]
pub struct PomodoroSessions {
    sessions: Arc<DashMap<u64, Arc<SessionState>>>,
}

impl PomodoroSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_start(&self, channel_id: u64) -> Option<Arc<SessionState>> {
        match self.sessions.entry(channel_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let state = Arc::new(SessionState::default());
                slot.insert(Arc::clone(&state));
                Some(state)
            }
        }
    }

    /// Like `try_start`, but the slot is released again unless the claim is
    /// kept.
    pub fn claim(&self, channel_id: u64) -> Option<SessionClaim<'_>> {
        self.try_start(channel_id).map(|state| SessionClaim {
            sessions: self,
            channel_id,
            state,
            armed: true,
        })
    }

    pub fn is_running(&self, channel_id: u64) -> bool {
        self.sessions.contains_key(&channel_id)
    }

    pub fn finish(&self, channel_id: u64) {
        self.sessions.remove(&channel_id);
    }

    pub fn stop(&self, channel_id: u64, user_id: u64) -> StopResult {
        let Some(state) = self.sessions.get(&channel_id).map(|s| s.value().clone()) else {
            return StopResult::NotRunning;
        };
        if !state.is_participant(user_id) {
            return StopResult::NotParticipant;
        }
        state.stop();
        StopResult::Stopped
    }

    /// Runs a whole session in the background and frees the channel afterwards.
    pub fn spawn(&self, http: Arc<Http>, channel_id: u64, plan: PomodoroPlan, state: Arc<SessionState>) {
        let sessions = self.clone();
        tokio::spawn(async move {
            if let Err(e) = run_session(&http, ChannelId(channel_id), &plan, &state).await {
                error!("❌ Pomodoro session in channel {} failed: {}", channel_id, e);
            }
            sessions.finish(channel_id);
        });
    }
}

async fn run_session(http: &Arc<Http>, channel: ChannelId, plan: &PomodoroPlan, state: &SessionState) -> Result<()> {
    let join_message = channel.send_message(http, |m| m.set_embed(join_embed(plan))).await?;
    channel
        .create_reaction(http, join_message.id, ReactionType::Unicode(JOIN_EMOJI.to_string()))
        .await?;

    tokio::time::sleep(JOIN_WINDOW).await;

    let users = channel
        .reaction_users(
            http,
            join_message.id,
            ReactionType::Unicode(JOIN_EMOJI.to_string()),
            Some(100),
            None,
        )
        .await
        .unwrap_or_else(|e| {
            warn!("⚠️ Could not read Pomodoro join reactions: {}", e);
            Vec::new()
        });
    let participants: Vec<u64> = users.iter().filter(|u| !u.bot).map(|u| u.id.0).collect();

    if participants.is_empty() {
        channel.say(http, NOBODY_JOINED).await?;
        return Ok(());
    }

    let mentions: Vec<String> = participants.iter().map(|id| format!("<@{}>", id)).collect();
    state.set_participants(participants.iter().copied());
    channel
        .say(
            http,
            format!(
                "🍅 Pomodoro session is starting!\nParticipants: {}",
                mentions.join(", ")
            ),
        )
        .await?;
    info!(
        "🍅 Pomodoro started in channel {} with {} participant(s)",
        channel.0,
        participants.len()
    );

    for phase in plan.phases() {
        if !run_phase(http, channel, &phase, plan.cycles, state).await {
            info!("🛑 Pomodoro in channel {} stopped", channel.0);
            return Ok(());
        }
    }

    channel.say(http, COMPLETE).await?;
    Ok(())
}

/// Returns false when the session was stopped or the message could not be kept up to date.
async fn run_phase(http: &Arc<Http>, channel: ChannelId, phase: &Phase, cycles: u32, state: &SessionState) -> bool {
    let message = match channel
        .send_message(http, |m| {
            m.set_embed(phase_embed(phase, cycles, None))
                .set_components(stop_components())
        })
        .await
    {
        Ok(message) => message,
        Err(e) => {
            error!("❌ Failed to send Pomodoro message: {}", e);
            return false;
        }
    };

    let deadline = Instant::now() + Duration::from_secs(phase.seconds);
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return true;
        }
        let edit = channel
            .edit_message(http, message.id, |m| {
                m.set_embed(phase_embed(phase, cycles, Some(remaining.as_secs())))
                    .set_components(stop_components())
            })
            .await;
        if let Err(e) = edit {
            // The stop button replaces the message, so a failed edit after a
            // stop is expected.
            if !state.is_stopped() {
                error!("❌ Failed to edit Pomodoro message: {}", e);
            }
            return !state.is_stopped();
        }
        if !state.wait(remaining.min(TICK)).await {
            return false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{description, title};

    #[test]
    fn test_phase_plan_has_no_trailing_break() {
        let plan = PomodoroPlan::from_minutes(25.0, 5.0, 4).unwrap();
        let phases = plan.phases();
        assert_eq!(phases.len(), 7);
        assert_eq!(phases.last().unwrap().kind, PhaseKind::Work);
        assert_eq!(phases[1], Phase { cycle: 1, kind: PhaseKind::Break, seconds: 300 });

        let single = PomodoroPlan::from_minutes(1.0, 1.0, 1).unwrap().phases();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_fractional_minutes() {
        let plan = PomodoroPlan::from_minutes(0.5, 0.25, 2).unwrap();
        assert_eq!(plan.focus_secs, 30);
        assert_eq!(plan.break_secs, 15);
    }

    #[test]
    fn test_plan_validation() {
        assert!(PomodoroPlan::from_minutes(0.0, 5.0, 4).is_err());
        assert!(PomodoroPlan::from_minutes(25.0, -1.0, 4).is_err());
        assert!(PomodoroPlan::from_minutes(25.0, 5.0, 0).is_err());
        assert!(PomodoroPlan::from_minutes(25.0, 5.0, 13).is_err());
        assert!(PomodoroPlan::from_minutes(0.001, 5.0, 1).is_err());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(1500), "25:00");
    }

    #[test]
    fn test_phase_embed() {
        let phase = Phase { cycle: 2, kind: PhaseKind::Break, seconds: 300 };
        let embed = phase_embed(&phase, 4, Some(299));
        assert_eq!(title(&embed), Some("🔔 Cycle 2/4 — Break!"));
        assert_eq!(
            description(&embed),
            Some("**Break Time!**\nRelax and recharge! 😌\n\n`04:59`")
        );
        assert!(embed.0.get("image").is_none());

        let work = Phase { cycle: 1, kind: PhaseKind::Work, seconds: 60 };
        assert!(phase_embed(&work, 4, None).0.get("image").is_some());
    }

    #[test]
    fn test_one_session_per_channel() {
        let sessions = PomodoroSessions::new();
        assert!(sessions.try_start(1).is_some());
        assert!(sessions.try_start(1).is_none());
        assert!(sessions.is_running(1));
        sessions.finish(1);
        assert!(sessions.try_start(1).is_some());
    }

    #[test]
    fn test_dropped_claim_releases_channel() {
        let sessions = PomodoroSessions::new();
        {
            let claim = sessions.claim(1);
            assert!(claim.is_some());
            assert!(sessions.claim(1).is_none());
        }
        assert!(!sessions.is_running(1));

        let state = sessions.claim(1).unwrap().keep();
        assert!(sessions.is_running(1));
        assert!(sessions.claim(1).is_none());
        assert!(!state.is_stopped());
    }

    #[test]
    fn test_join_embed_shows_fractional_minutes() {
        assert_eq!(format_minutes(1500), "25");
        assert_eq!(format_minutes(30), "0.5");
        assert_eq!(format_minutes(90), "1.5");

        let plan = PomodoroPlan::from_minutes(0.5, 5.0, 2).unwrap();
        let text = description(&join_embed(&plan)).unwrap().to_string();
        assert!(text.contains("**0.5 min focus**, **5 min break**, 2 cycles."));
    }

    #[test]
    fn test_only_participants_stop() {
        let sessions = PomodoroSessions::new();
        assert_eq!(sessions.stop(1, 5), StopResult::NotRunning);

        let state = sessions.try_start(1).unwrap();
        state.set_participants([5, 6]);
        assert_eq!(sessions.stop(1, 7), StopResult::NotParticipant);
        assert!(!state.is_stopped());
        assert_eq!(sessions.stop(1, 6), StopResult::Stopped);
        assert!(state.is_stopped());
    }

    #[tokio::test]
    async fn test_wait_returns_early_on_stop() {
        let state = Arc::new(SessionState::default());
        let waiter = Arc::clone(&state);
        let handle = tokio::spawn(async move { waiter.wait(Duration::from_secs(60)).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        state.stop();
        let finished = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(!finished.unwrap().unwrap());
    }
}
