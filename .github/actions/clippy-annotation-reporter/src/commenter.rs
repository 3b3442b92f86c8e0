// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Commenter module for clippy-annotation-reporter
//!
//! This module handles interactions with GitHub for commenting on PRs,
//! including finding existing comments and updating or creating comments.

use anyhow::{Context as _, Result};
use log::{error, info};
use octocrab::Octocrab;

/// Post or update a comment on a PR with the given report
pub async fn post_comment(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    pr_number: u64,
    report: String,
    signature: Option<&str>,
) -> Result<()> {
    // Use the provided signature or default
    let signature = signature.unwrap_or("<!-- clippy-annotation-reporter-comment -->");

    // Add the signature to the report
    let report_with_signature = format!("{}\n\n{}", report, signature);

    // Search for existing comment by the bot
    info!("Checking for existing comment on PR #{}", pr_number);
    let existing_comment =
        find_existing_comment(octocrab, owner, repo, pr_number, signature).await?;

    // Update existing comment or create a new one
    if let Some(comment_id) = existing_comment {
        info!("Updating existing comment #{}", comment_id);
        octocrab
            .issues(owner, repo)
            .update_comment(comment_id.into(), report_with_signature)
            .await
            .context("Failed to update existing comment")?;
    } else {
        info!("Creating new comment on PR #{}", pr_number);
        octocrab
            .issues(owner, repo)
            .create_comment(pr_number, report_with_signature)
            .await
            .context("Failed to post comment to PR")?;
    }

    Ok(())
}

/// Find existing comment by the bot on a PR
async fn find_existing_comment(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    pr_number: u64,
    signature: &str,
) -> Result<Option<u64>> {
    // Get all comments on the PR
    let page = octocrab
        .issues(owner, repo)
        .list_comments(pr_number)
        .per_page(100)
        .send()
        .await
        .context("Failed to list PR comments")?;

    let all_pages = octocrab
        .all_pages(page)
        .await
        .context("Failed to fetch all pages of comments")?;

    for comment in all_pages {
        if comment
            .body
            .as_ref()
            .is_some_and(|body| body.contains(signature))
        {
            return Ok(Some(*comment.id));
        }
    }

    // No matching comment found
    Ok(None)
}
