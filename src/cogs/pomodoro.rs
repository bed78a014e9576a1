use anyhow::Result;
use log::info;
use serenity::prelude::Context;

use crate::command_handler::CommandHandler;
use crate::commands::invocation::{Invocation, Reply};
use crate::pomodoro::{PomodoroPlan, ALREADY_RUNNING, DEFAULT_BREAK_MINUTES, DEFAULT_CYCLES, DEFAULT_FOCUS_MINUTES};

impl CommandHandler {
    pub(crate) async fn pomodoro(
        &self,
        ctx: &Context,
        inv: &Invocation<'_>,
        focus: Option<f64>,
        brk: Option<f64>,
        cycles: Option<i64>,
    ) -> Result<()> {
        let plan = match PomodoroPlan::from_minutes(
            focus.unwrap_or(DEFAULT_FOCUS_MINUTES),
            brk.unwrap_or(DEFAULT_BREAK_MINUTES),
            cycles.unwrap_or(DEFAULT_CYCLES),
        ) {
            Ok(plan) => plan,
            Err(reason) => {
                inv.send(ctx, Reply::text(reason).ephemeral()).await?;
                return Ok(());
            }
        };

        let channel_id = inv.channel_id().0;
        let Some(claim) = self.pomodoro.claim(channel_id) else {
            inv.send(ctx, Reply::text(ALREADY_RUNNING).ephemeral()).await?;
            return Ok(());
        };

        // Slash commands need a response before the session posts its own messages.
        // A failure here drops the claim and frees the channel.
        if inv.is_slash() {
            inv.send(ctx, Reply::text("🍅 Setting up your Pomodoro session...").ephemeral())
                .await?;
        }
        let state = claim.keep();

        info!(
            "🍅 Pomodoro requested by {} in channel {} ({} cycle(s))",
            inv.user_id(),
            channel_id,
            plan.cycles
        );
        self.pomodoro.spawn(ctx.http.clone(), channel_id, plan, state);
        Ok(())
    }
}
