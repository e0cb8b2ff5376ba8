//! Test fixtures for API integration tests
//!
//! Provides a small social graph over a [`MemoryStore`]:
//!
//! - alice is followed by bob and carol
//! - alice follows carol
//! - alice has two posts, bob has one, carol has none
//! - alice has a business profile, bob a basic one, carol none

#![allow(dead_code)]

use std::sync::Arc;

use pulse_api::models::{MemberTypeId, Post, Profile, User};
use pulse_api::MemoryStore;

/// Seeded store together with the rows it holds
pub struct Seed {
    pub store: Arc<MemoryStore>,
    pub alice: User,
    pub bob: User,
    pub carol: User,
    pub alice_posts: Vec<Post>,
    pub bob_post: Post,
    pub alice_profile: Profile,
    pub bob_profile: Profile,
}

impl Seed {
    /// Build the standard fixture graph
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());

        let alice = store.insert_user("alice", 100.0);
        let bob = store.insert_user("bob", 50.5);
        let carol = store.insert_user("carol", 0.0);

        store.insert_subscription(bob.id, alice.id);
        store.insert_subscription(carol.id, alice.id);
        store.insert_subscription(alice.id, carol.id);

        let alice_posts = vec![
            store.insert_post(alice.id, "First", "Hello"),
            store.insert_post(alice.id, "Second", "Again"),
        ];
        let bob_post = store.insert_post(bob.id, "Bob writes", "Hi");

        let alice_profile = store.insert_profile(alice.id, MemberTypeId::Business, false, 1990);
        let bob_profile = store.insert_profile(bob.id, MemberTypeId::Basic, true, 1985);

        Self {
            store,
            alice,
            bob,
            carol,
            alice_posts,
            bob_post,
            alice_profile,
            bob_profile,
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self::new()
    }
}

/// A chain of users wider than the executor's small-list threshold
///
/// `users[i]` follows `users[i - 1]`; every user has one post and a basic
/// profile.
pub struct WideSeed {
    pub store: Arc<MemoryStore>,
    pub users: Vec<User>,
}

impl WideSeed {
    pub fn new(count: usize) -> Self {
        let store = Arc::new(MemoryStore::new());

        let users: Vec<User> = (0..count)
            .map(|i| store.insert_user(&format!("user-{i:03}"), i as f64))
            .collect();
        for pair in users.windows(2) {
            store.insert_subscription(pair[1].id, pair[0].id);
        }
        for (i, user) in users.iter().enumerate() {
            store.insert_post(user.id, &format!("post-{i:03}"), "body");
            store.insert_profile(user.id, MemberTypeId::Basic, i % 2 == 0, 1970 + i as i32);
        }

        Self { store, users }
    }
}
