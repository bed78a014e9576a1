//! Dictionary, word association and Wikipedia lookups.

use anyhow::Result;
use log::{debug, error};
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::command_handler::CommandHandler;
use crate::commands::invocation::Invocation;
use crate::{dictionary, wiki, word_association};

impl CommandHandler {
    pub(crate) async fn define(&self, ctx: &Context, inv: &Invocation<'_>, word: &str) -> Result<()> {
        let word = word.trim();
        if word.is_empty() {
            return self.missing_arguments(ctx, inv, "?def <word>").await;
        }

        inv.defer(ctx).await?;
        match self.dictionary.lookup(word).await {
            Some(definition) => {
                inv.send_embed(ctx, dictionary::definition_embed(&definition)).await?;
            }
            None => {
                debug!("No definition found for '{}'", word);
                inv.say(ctx, dictionary::not_found_message(word)).await?;
            }
        }
        Ok(())
    }

    pub(crate) async fn associate(&self, ctx: &Context, msg: &Message, word: &str) -> Result<()> {
        if !self.require_access(ctx, msg, |a| a.has_permission()).await? {
            return Ok(());
        }
        let inv = Invocation::prefix(msg);
        let word = word.trim();
        if word.is_empty() {
            return self.missing_arguments(ctx, &inv, "?associate <word>").await;
        }

        match self.datamuse.associate(word).await {
            Ok(found) if found.is_empty() => {
                inv.say(ctx, word_association::empty_message(word)).await?;
            }
            Ok(found) => {
                inv.send_embed(ctx, word_association::associations_embed(word, &found))
                    .await?;
            }
            Err(e) => {
                error!("❌ Datamuse request failed: {}", e);
                inv.say(ctx, word_association::CONNECT_FAILURE).await?;
            }
        }
        Ok(())
    }

    pub(crate) async fn wiki_summary(&self, ctx: &Context, msg: &Message, topic: &str) -> Result<()> {
        if !self.require_access(ctx, msg, |a| a.has_permission()).await? {
            return Ok(());
        }
        let inv = Invocation::prefix(msg);
        let topic = topic.trim();
        if topic.is_empty() {
            return self.missing_arguments(ctx, &inv, "?wiki <topic>").await;
        }

        match self.wiki.lookup(topic).await {
            Ok(wiki::WikiLookup::Found(summary)) => {
                inv.send_embed(ctx, wiki::summary_embed(&summary)).await?;
            }
            Ok(wiki::WikiLookup::Suggestion(title)) => {
                inv.say(ctx, wiki::suggestion_message(&title)).await?;
            }
            Ok(wiki::WikiLookup::NotFound) => {
                inv.say(ctx, wiki::not_found_message(topic)).await?;
            }
            Err(e) => {
                error!("❌ Wikipedia request failed: {}", e);
                inv.say(ctx, wiki::CONNECT_FAILURE).await?;
            }
        }
        Ok(())
    }
}
