//! PostgreSQL implementation of the [`Store`] contract
//!
//! Bulk reads use `= ANY($1)` so each call is exactly one round-trip no
//! matter how many keys it carries.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::utils::{MEMBER_TYPE_COLUMNS, POST_COLUMNS, PROFILE_COLUMNS, USER_COLUMNS, USER_COLUMNS_U};
use super::{Store, StoreError, StoreResult};
use crate::models::{
    ChangePost, ChangeProfile, ChangeUser, CreatePost, CreateProfile, CreateUser, LinkedUser,
    MemberType, MemberTypeId, Post, Profile, RequestedRelations, SubscriptionEdge, User,
    UserWithSubscriptions,
};

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new PgStore instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn users_with_subscriptions(
        &self,
        relations: RequestedRelations,
    ) -> StoreResult<Vec<UserWithSubscriptions>> {
        // Directions that were not requested skip the edge lookup entirely
        let sql = format!(
            r#"
            SELECT
                {cols},
                CASE WHEN $1
                    THEN ARRAY(SELECT s.author_id FROM subscriptions s WHERE s.subscriber_id = u.id)
                    ELSE '{{}}'::uuid[]
                END AS user_subscribed_to_ids,
                CASE WHEN $2
                    THEN ARRAY(SELECT s.subscriber_id FROM subscriptions s WHERE s.author_id = u.id)
                    ELSE '{{}}'::uuid[]
                END AS subscribed_to_user_ids
            FROM users u
            "#,
            cols = USER_COLUMNS_U
        );
        Ok(sqlx::query_as::<_, UserWithSubscriptions>(&sql)
            .bind(relations.user_subscribed_to)
            .bind(relations.subscribed_to_user)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn authors_followed_by(&self, subscriber_ids: &[Uuid]) -> StoreResult<Vec<LinkedUser>> {
        let sql = format!(
            r#"
            SELECT s.subscriber_id AS linked_id, {cols}
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.subscriber_id = ANY($1)
            "#,
            cols = USER_COLUMNS_U
        );
        Ok(sqlx::query_as::<_, LinkedUser>(&sql)
            .bind(subscriber_ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn subscribers_of(&self, author_ids: &[Uuid]) -> StoreResult<Vec<LinkedUser>> {
        let sql = format!(
            r#"
            SELECT s.author_id AS linked_id, {cols}
            FROM subscriptions s
            JOIN users u ON u.id = s.subscriber_id
            WHERE s.author_id = ANY($1)
            "#,
            cols = USER_COLUMNS_U
        );
        Ok(sqlx::query_as::<_, LinkedUser>(&sql)
            .bind(author_ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn posts_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Post>> {
        let sql = format!("SELECT {} FROM posts WHERE id = ANY($1)", POST_COLUMNS);
        Ok(sqlx::query_as::<_, Post>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn posts_by_author_ids(&self, author_ids: &[Uuid]) -> StoreResult<Vec<Post>> {
        let sql = format!("SELECT {} FROM posts WHERE author_id = ANY($1)", POST_COLUMNS);
        Ok(sqlx::query_as::<_, Post>(&sql)
            .bind(author_ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn all_posts(&self) -> StoreResult<Vec<Post>> {
        let sql = format!("SELECT {} FROM posts", POST_COLUMNS);
        Ok(sqlx::query_as::<_, Post>(&sql).fetch_all(&self.pool).await?)
    }

    async fn profiles_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Profile>> {
        let sql = format!("SELECT {} FROM profiles WHERE id = ANY($1)", PROFILE_COLUMNS);
        Ok(sqlx::query_as::<_, Profile>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn profiles_by_user_ids(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Profile>> {
        let sql = format!(
            "SELECT {} FROM profiles WHERE user_id = ANY($1)",
            PROFILE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Profile>(&sql)
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn all_profiles(&self) -> StoreResult<Vec<Profile>> {
        let sql = format!("SELECT {} FROM profiles", PROFILE_COLUMNS);
        Ok(sqlx::query_as::<_, Profile>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn member_types_by_ids(&self, ids: &[MemberTypeId]) -> StoreResult<Vec<MemberType>> {
        // Compare as text so the key array binds without a custom array type
        let keys: Vec<&str> = ids.iter().map(MemberTypeId::as_str).collect();
        let sql = format!(
            "SELECT {} FROM member_types WHERE id::text = ANY($1)",
            MEMBER_TYPE_COLUMNS
        );
        Ok(sqlx::query_as::<_, MemberType>(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn all_member_types(&self) -> StoreResult<Vec<MemberType>> {
        let sql = format!("SELECT {} FROM member_types ORDER BY id", MEMBER_TYPE_COLUMNS);
        Ok(sqlx::query_as::<_, MemberType>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (name, balance) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(input.name)
            .bind(input.balance)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_user(&self, id: Uuid, changes: ChangeUser) -> StoreResult<User> {
        let sql = format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                balance = COALESCE($3, balance)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.balance)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("user", id))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user", id));
        }
        Ok(())
    }

    async fn create_post(&self, input: CreatePost) -> StoreResult<Post> {
        let sql = format!(
            "INSERT INTO posts (title, content, author_id) VALUES ($1, $2, $3) RETURNING {}",
            POST_COLUMNS
        );
        Ok(sqlx::query_as::<_, Post>(&sql)
            .bind(input.title)
            .bind(input.content)
            .bind(input.author_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_post(&self, id: Uuid, changes: ChangePost) -> StoreResult<Post> {
        let sql = format!(
            r#"
            UPDATE posts SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                author_id = COALESCE($4, author_id)
            WHERE id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.content)
            .bind(changes.author_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("post", id))
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("post", id));
        }
        Ok(())
    }

    async fn create_profile(&self, input: CreateProfile) -> StoreResult<Profile> {
        let sql = format!(
            r#"
            INSERT INTO profiles (is_male, year_of_birth, member_type_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Profile>(&sql)
            .bind(input.is_male)
            .bind(input.year_of_birth)
            .bind(input.member_type_id)
            .bind(input.user_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_profile(&self, id: Uuid, changes: ChangeProfile) -> StoreResult<Profile> {
        let sql = format!(
            r#"
            UPDATE profiles SET
                is_male = COALESCE($2, is_male),
                year_of_birth = COALESCE($3, year_of_birth),
                member_type_id = COALESCE($4, member_type_id)
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .bind(changes.is_male)
            .bind(changes.year_of_birth)
            .bind(changes.member_type_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("profile", id))
    }

    async fn delete_profile(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("profile", id));
        }
        Ok(())
    }

    async fn subscribe(&self, edge: SubscriptionEdge) -> StoreResult<()> {
        sqlx::query("INSERT INTO subscriptions (subscriber_id, author_id) VALUES ($1, $2)")
            .bind(edge.subscriber_id)
            .bind(edge.author_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn unsubscribe(&self, edge: SubscriptionEdge) -> StoreResult<()> {
        let result =
            sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND author_id = $2")
                .bind(edge.subscriber_id)
                .bind(edge.author_id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(
                "subscription",
                format!("{} -> {}", edge.subscriber_id, edge.author_id),
            ));
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
