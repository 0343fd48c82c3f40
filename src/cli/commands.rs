//! CLI command implementations.

use std::path::Path;

use crate::config::EngineConfig;
use crate::engine::{RankedNode, ScoreEngine, ScoreState, VoteEngine};
use crate::format::{Snapshot, SnapshotReader, SnapshotWriter};
use crate::graph::DiscussionTree;
use crate::store::TreeShape;
use crate::types::{
    now_micros, Direction, Location, Placement, Post, PostId, ScoreError, ScoreResult, VoteEvent,
    VoterId,
};

/// A snapshot with every vote replayed into fresh scoring state.
struct Loaded {
    tree: DiscussionTree,
    state: ScoreState,
    votes: usize,
}

fn load(path: &Path, config: &EngineConfig) -> ScoreResult<Loaded> {
    let snapshot = SnapshotReader::read_from_file(path)?;
    let (tree, ledger) = snapshot.into_parts()?;
    let mut state = ScoreState::new(config)?;
    let engine = VoteEngine::new(*config);
    let report = engine.replay(&tree, &mut state, ledger.events().iter().cloned())?;
    Ok(Loaded {
        tree,
        state,
        votes: report.votes_applied,
    })
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

/// Create a new empty snapshot file.
pub fn cmd_create(path: &Path) -> ScoreResult<()> {
    SnapshotWriter::new(true).write_to_file(&Snapshot::default(), path)?;
    println!("Created {}", path.display());
    Ok(())
}

/// Add a post (or a reply, with `parent_id`) to a snapshot.
pub fn cmd_post(
    path: &Path,
    post_id: PostId,
    parent_id: Option<PostId>,
    score: f64,
    json: bool,
) -> ScoreResult<()> {
    let snapshot = SnapshotReader::read_from_file(path)?;
    let (mut tree, ledger) = snapshot.into_parts()?;
    let post = match parent_id {
        Some(parent) => Post::reply(post_id, parent),
        None => Post::new(post_id),
    }
    .with_score(score);
    tree.add_post(post)?;
    SnapshotWriter::new(true).write_to_file(&Snapshot::capture(&tree, &ledger), path)?;

    if json {
        println!(
            "{}",
            serde_json::json!({"id": post_id, "parent_id": parent_id, "score": score})
        );
    } else {
        match parent_id {
            Some(parent) => println!("Added reply {} to {}", post_id, parent),
            None => println!("Added post {}", post_id),
        }
    }
    Ok(())
}

/// Append a vote to a snapshot after checking that it applies cleanly.
#[allow(clippy::too_many_arguments)]
pub fn cmd_vote(
    path: &Path,
    config: &EngineConfig,
    voter_id: VoterId,
    target_id: PostId,
    direction: Direction,
    note_id: Option<PostId>,
    placement: Option<Placement>,
    timestamp: Option<u64>,
    json: bool,
) -> ScoreResult<()> {
    let mut loaded = load(path, config)?;
    let mut event = VoteEvent::new(
        voter_id,
        target_id,
        direction,
        timestamp.unwrap_or_else(now_micros),
    );
    event.note_id = note_id;
    event.placement = placement;

    let engine = VoteEngine::new(*config);
    let result = engine.ingest(&loaded.tree, &mut loaded.state, event)?;
    let snapshot = Snapshot::capture(&loaded.tree, loaded.state.ledger());
    SnapshotWriter::new(true).write_to_file(&snapshot, path)?;

    if json {
        print_json(&serde_json::json!({
            "target_id": result.target_id,
            "recomputed_posts": result.recomputed_posts,
            "effects_written": result.effects_written,
            "vote_share": result.vote_share,
        }));
    } else {
        println!(
            "Recorded {} vote by {} on {} ({} posts recomputed, {} effects written)",
            direction,
            voter_id,
            target_id,
            result.recomputed_posts.len(),
            result.effects_written
        );
        if let Some(share) = result.vote_share {
            println!("Location vote share: {:.6}", share);
        }
    }
    Ok(())
}

/// Display counts for a snapshot.
pub fn cmd_info(path: &Path, config: &EngineConfig, json: bool) -> ScoreResult<()> {
    let loaded = load(path, config)?;
    let attention = loaded.state.attention();

    if json {
        print_json(&serde_json::json!({
            "file": path.display().to_string(),
            "posts": loaded.tree.post_count(),
            "roots": loaded.tree.roots().len(),
            "votes": loaded.votes,
            "exploration_votes": attention.sitewide_vote_count(),
            "locations": attention.all_stats().len(),
        }));
    } else {
        println!("File: {}", path.display());
        println!("Posts: {}", loaded.tree.post_count());
        println!("Roots: {}", loaded.tree.roots().len());
        println!("Votes: {}", loaded.votes);
        println!("Exploration votes: {}", attention.sitewide_vote_count());
        println!("Locations: {}", attention.all_stats().len());
    }
    Ok(())
}

/// Print the ranked reply tree under a post.
pub fn cmd_rank(path: &Path, config: &EngineConfig, post_id: PostId, json: bool) -> ScoreResult<()> {
    let loaded = load(path, config)?;
    let engine = ScoreEngine::new(*config);
    let ranked = engine.ranked_reply_tree_or_unranked(&loaded.tree, &loaded.state, post_id)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&ranked).unwrap_or_default()
        );
    } else {
        print_ranked(&ranked);
    }
    Ok(())
}

fn print_ranked(root: &RankedNode) {
    let mut stack: Vec<(&RankedNode, usize, bool)> = vec![(root, 0, false)];
    while let Some((node, depth, critical)) = stack.pop() {
        let indent = "  ".repeat(depth);
        let marker = if critical { " *" } else { "" };
        let deleted = if node.deleted { " [deleted]" } else { "" };
        println!(
            "{}Post {} (effect: {:.4}, score: {:.2}){}{}",
            indent, node.post_id, node.effect_size, node.score, deleted, marker
        );
        for child in node.children.iter().rev() {
            let is_critical = node.critical_thread_id == Some(child.post_id);
            stack.push((child, depth + 1, is_critical));
        }
    }
}

/// Print informed/uninformed probabilities and the top note of a post.
pub fn cmd_probability(
    path: &Path,
    config: &EngineConfig,
    post_id: PostId,
    json: bool,
) -> ScoreResult<()> {
    let loaded = load(path, config)?;
    let engine = ScoreEngine::new(*config);
    let top = engine.top_note(&loaded.tree, &loaded.state, post_id)?;
    let overall = loaded.state.tallies().overall(post_id);

    if json {
        print_json(&serde_json::json!({
            "post_id": post_id,
            "p": top.p,
            "q": top.q,
            "top_note_id": top.note_id,
            "upvotes": overall.count,
            "votes": overall.total,
        }));
    } else {
        println!("Post {}", post_id);
        println!("  Informed (p): {:.4}", top.p);
        println!("  Uninformed (q): {:.4}", top.q);
        match top.note_id {
            Some(note) => println!("  Top note: {}", note),
            None => println!("  Top note: none"),
        }
        println!("  Votes: {}/{} up", overall.count, overall.total);
    }
    Ok(())
}

/// Print the effect of a reply on a target post.
pub fn cmd_effect(
    path: &Path,
    config: &EngineConfig,
    target_id: PostId,
    reply_id: PostId,
    json: bool,
) -> ScoreResult<()> {
    let loaded = load(path, config)?;
    if loaded.tree.post(target_id).is_none() {
        return Err(ScoreError::PostNotFound(target_id));
    }
    if loaded.tree.post(reply_id).is_none() {
        return Err(ScoreError::PostNotFound(reply_id));
    }
    let engine = ScoreEngine::new(*config);
    let effect = engine.effect(&loaded.state, target_id, reply_id);
    let size = engine.effect_size(&loaded.state, target_id, reply_id)?;

    if json {
        print_json(&serde_json::json!({
            "target_id": target_id,
            "reply_id": reply_id,
            "effect": effect,
            "effect_size": size,
        }));
    } else {
        println!("Effect of {} on {}", reply_id, target_id);
        match effect {
            Some(e) => {
                println!("  p: {:.4} ({}/{})", e.p, e.p_count, e.p_size);
                println!("  q: {:.4} ({}/{})", e.q, e.q_count, e.q_size);
                println!("  Support ratio: {:.4}", e.r);
                println!("  Weight: {:.2}", e.weight);
            }
            None => println!("  No effect recorded"),
        }
        println!("  Effect size: {:.6}", size);
    }
    Ok(())
}

/// Print the critical thread below a post.
pub fn cmd_thread(path: &Path, config: &EngineConfig, post_id: PostId, json: bool) -> ScoreResult<()> {
    let loaded = load(path, config)?;
    let engine = ScoreEngine::new(*config);
    let thread = engine.critical_thread(&loaded.tree, &loaded.state, post_id)?;

    if json {
        print_json(&serde_json::json!({"post_id": post_id, "critical_thread": thread}));
    } else if thread.is_empty() {
        println!("Post {} has no critical thread", post_id);
    } else {
        let chain: Vec<String> = std::iter::once(post_id)
            .chain(thread.iter().copied())
            .map(|id| id.to_string())
            .collect();
        println!("Critical thread: {}", chain.join(" -> "));
    }
    Ok(())
}

/// Print calibrated vote shares per location.
pub fn cmd_attention(
    path: &Path,
    config: &EngineConfig,
    location: Option<Location>,
    json: bool,
) -> ScoreResult<()> {
    let loaded = load(path, config)?;
    let attention = loaded.state.attention();
    let rows: Vec<(Location, f64)> = match location {
        Some(loc) => vec![(loc, attention.vote_share(&loc))],
        None => attention
            .all_stats()
            .iter()
            .map(|r| (r.location, attention.vote_share(&r.location)))
            .collect(),
    };

    if json {
        let items: Vec<serde_json::Value> = rows
            .iter()
            .map(|(loc, share)| {
                serde_json::json!({
                    "location_type": loc.location_type.name(),
                    "rank": loc.one_based_rank,
                    "vote_share": share,
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "sitewide_votes": attention.sitewide_vote_count(),
            "window_size": attention.window_size(),
            "locations": items,
        }));
    } else {
        println!(
            "Sitewide exploration votes: {} (window {})",
            attention.sitewide_vote_count(),
            attention.window_size()
        );
        for (loc, share) in &rows {
            println!("  {}: {:.6}", loc, share);
        }
    }
    Ok(())
}
