//! Criterion benchmarks for discourse-score.

use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use tempfile::NamedTempFile;

use discourse_score::config::EngineConfig;
use discourse_score::engine::probability::top_notes;
use discourse_score::engine::{rank_reply_tree, AttentionCalibrator, ScoreState, VoteEngine};
use discourse_score::format::{Snapshot, SnapshotReader, SnapshotWriter};
use discourse_score::graph::DiscussionTree;
use discourse_score::store::TreeShape;
use discourse_score::types::{
    Direction, Location, LocationType, Post, PostId, VoteEvent, DEFAULT_ALPHA,
};

/// Build a discussion of `post_count` posts under root 0, each replying to a random earlier post.
fn make_tree(post_count: usize) -> DiscussionTree {
    let mut rng = rand::thread_rng();
    let mut posts: Vec<Post> = Vec::with_capacity(post_count);
    posts.push(Post::new(0));
    for i in 1..post_count {
        let parent = rng.gen_range(0..i) as PostId;
        posts.push(Post::reply(i as PostId, parent).with_score(rng.gen_range(0.0..10.0)));
    }
    DiscussionTree::from_parts(posts).unwrap()
}

/// Random votes, each on a random post and shown one of its direct replies when it has any.
fn make_votes(tree: &DiscussionTree, vote_count: usize) -> Vec<VoteEvent> {
    let mut rng = rand::thread_rng();
    let post_count = tree.post_count() as PostId;
    (0..vote_count)
        .map(|i| {
            let target = rng.gen_range(0..post_count);
            let direction = if rng.gen_bool(0.7) {
                Direction::Up
            } else {
                Direction::Down
            };
            let mut event = VoteEvent::new(rng.gen_range(0..1_000), target, direction, i as u64);
            let replies = tree.direct_reply_ids(target);
            if !replies.is_empty() && rng.gen_bool(0.5) {
                event = event.shown(replies[rng.gen_range(0..replies.len())]);
            }
            event
        })
        .collect()
}

fn scored_state(tree: &DiscussionTree, vote_count: usize) -> ScoreState {
    let config = EngineConfig::default();
    let mut state = ScoreState::new(&config).unwrap();
    VoteEngine::new(config)
        .replay(tree, &mut state, make_votes(tree, vote_count))
        .unwrap();
    state
}

fn bench_rank_reply_tree(c: &mut Criterion) {
    let tree = make_tree(10_000);
    let state = scored_state(&tree, 5_000);

    c.bench_function("rank_reply_tree_10k", |b| {
        b.iter(|| {
            let _ = rank_reply_tree(&tree, state.effects(), 0);
        })
    });
}

fn bench_top_notes(c: &mut Criterion) {
    let tree = make_tree(10_000);
    let state = scored_state(&tree, 5_000);
    let prior = EngineConfig::default().global_prior();

    c.bench_function("top_notes_10k", |b| {
        b.iter(|| {
            let _ = top_notes(prior, &tree, state.tallies(), 0);
        })
    });
}

fn bench_ingest_vote(c: &mut Criterion) {
    let tree = make_tree(1_000);
    let mut state = scored_state(&tree, 1_000);
    let engine = VoteEngine::new(EngineConfig::default());

    c.bench_function("ingest_vote_1k_posts", |b| {
        let mut rng = rand::thread_rng();
        let mut timestamp = 1_000u64;
        b.iter(|| {
            timestamp += 1;
            let target = rng.gen_range(0..1_000u64);
            let event = VoteEvent::new(rng.gen_range(0..1_000), target, Direction::Up, timestamp);
            let _ = engine.ingest(&tree, &mut state, event);
        })
    });
}

fn bench_exploration_vote(c: &mut Criterion) {
    let mut calibrator = AttentionCalibrator::new(DEFAULT_ALPHA).unwrap();
    let locations: Vec<Location> = (1..=30)
        .map(|rank| Location::new(LocationType::Frontpage, rank).unwrap())
        .collect();

    c.bench_function("exploration_vote", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| {
            let loc = locations[rng.gen_range(0..locations.len())];
            let _ = calibrator.record_exploration_vote(loc);
        })
    });
}

fn bench_write_snapshot_10k(c: &mut Criterion) {
    let tree = make_tree(10_000);
    let state = scored_state(&tree, 10_000);
    let snapshot = Snapshot::capture(&tree, state.ledger());
    let writer = SnapshotWriter::default();

    c.bench_function("write_snapshot_10k", |b| {
        b.iter(|| {
            let tmp = NamedTempFile::new().unwrap();
            writer.write_to_file(&snapshot, tmp.path()).unwrap();
        })
    });
}

fn bench_read_snapshot_10k(c: &mut Criterion) {
    let tree = make_tree(10_000);
    let state = scored_state(&tree, 10_000);
    let tmp = NamedTempFile::new().unwrap();
    SnapshotWriter::default()
        .write_to_file(&Snapshot::capture(&tree, state.ledger()), tmp.path())
        .unwrap();

    c.bench_function("read_snapshot_10k", |b| {
        b.iter(|| {
            let _ = SnapshotReader::read_from_file(tmp.path()).unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_rank_reply_tree,
    bench_top_notes,
    bench_ingest_vote,
    bench_exploration_vote,
    bench_write_snapshot_10k,
    bench_read_snapshot_10k,
);
criterion_main!(benches);
