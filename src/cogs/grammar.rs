//! LanguageTool grammar checks.

use anyhow::Result;
use log::{error, info};
use serenity::prelude::Context;

use crate::command_handler::CommandHandler;
use crate::commands::invocation::{Invocation, Reply};
use crate::grammar::{
    clean_embed, failure_embed, languages_embed, no_fixes_message, quick_fix_embed, quick_fix_failed_message, GrammarView, DEFAULT_LANGUAGE, MAX_CHECK_CHARS,
    MAX_QUICKFIX_CHARS, QUICKFIX_TOO_LONG, TOO_LONG,
};

impl CommandHandler {
    pub(crate) async fn grammar_check(
        &self,
        ctx: &Context,
        inv: &Invocation<'_>,
        text: &str,
        language: Option<&str>,
    ) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return self.missing_arguments(ctx, inv, "?grammar <text>").await;
        }
        if text.chars().count() > MAX_CHECK_CHARS {
            inv.send(ctx, Reply::text(TOO_LONG).ephemeral()).await?;
            return Ok(());
        }

        let language = language.unwrap_or(DEFAULT_LANGUAGE);
        inv.defer(ctx).await?;

        let corrections = match self.grammar.check(text, language).await {
            Ok(corrections) => corrections,
            Err(e) => {
                error!("❌ Grammar check failed: {}", e);
                inv.send_embed(ctx, failure_embed(&e.to_string())).await?;
                return Ok(());
            }
        };

        if corrections.is_empty() {
            inv.send_embed(ctx, clean_embed(text, language)).await?;
            return Ok(());
        }

        info!("📝 {} grammar issue(s) for {}", corrections.len(), inv.user_id());
        let view = GrammarView::new(text, corrections, language);
        let reply = Reply::embed(view.initial_embed()).with_components(view.components(false));
        let message = inv.send(ctx, reply).await?;

        self.grammar_views.insert(message.id.0, message.channel_id.0, view);
        self.grammar_views.spawn_expiry(ctx.http.clone(), message.id.0);
        Ok(())
    }

    pub(crate) async fn quickfix(&self, ctx: &Context, inv: &Invocation<'_>, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return self.missing_arguments(ctx, inv, "?quickfix <text>").await;
        }
        if text.chars().count() > MAX_QUICKFIX_CHARS {
            inv.say(ctx, QUICKFIX_TOO_LONG).await?;
            return Ok(());
        }

        inv.defer(ctx).await?;
        match self.grammar.check(text, DEFAULT_LANGUAGE).await {
            Ok(corrections) if corrections.is_empty() => {
                inv.say(ctx, no_fixes_message(text)).await?;
            }
            Ok(corrections) => {
                inv.send_embed(ctx, quick_fix_embed(text, &corrections)).await?;
            }
            Err(e) => {
                error!("❌ Quick fix failed: {}", e);
                inv.say(ctx, quick_fix_failed_message(&e)).await?;
            }
        }
        Ok(())
    }

    pub(crate) async fn languages(&self, ctx: &Context, inv: &Invocation<'_>) -> Result<()> {
        inv.send_embed(ctx, languages_embed()).await?;
        Ok(())
    }
}
