//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Registered users.
    users (id) {
        /// Primary key, preserved through snapshots.
        id -> Uuid,
        /// Unique login name.
        username -> Text,
        /// Opaque password hash.
        password_hash -> Text,
        /// Lowercase role name.
        role -> Text,
    }
}

diesel::table! {
    /// Per-user bars, one per user.
    bars (id) {
        id -> Uuid,
        /// Owning user; unique.
        user_id -> Uuid,
        /// Array of `{name, category}` objects.
        bar_items -> Jsonb,
        favorite_cocktails -> Array<Text>,
        /// Array of removed cocktail copies.
        deleted_cocktails -> Jsonb,
    }
}

diesel::table! {
    /// Cocktail recipes.
    cocktails (id) {
        id -> Uuid,
        name -> Text,
        creator -> Text,
        style -> Text,
        comment -> Text,
        cocktail_category -> Text,
        image_url -> Nullable<Text>,
    }
}

diesel::table! {
    /// Ingredients owned by a cocktail.
    ingredients (id) {
        id -> Uuid,
        cocktail_id -> Uuid,
        volume -> Float8,
        unit -> Text,
        name -> Text,
        tag -> Nullable<Text>,
        order_index -> Int4,
    }
}

diesel::table! {
    /// Login session tokens.
    user_tokens (id) {
        id -> Uuid,
        value -> Text,
        user_id -> Uuid,
    }
}

diesel::joinable!(bars -> users (user_id));
diesel::joinable!(ingredients -> cocktails (cocktail_id));
diesel::joinable!(user_tokens -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(bars, cocktails, ingredients, user_tokens, users);
