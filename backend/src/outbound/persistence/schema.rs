//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Identity-provider users known to the app.
    users (id) {
        id -> Uuid,
        email -> Text,
        full_name -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    organizer_profiles (id) {
        id -> Uuid,
        user_id -> Uuid,
        org_name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    mountains (id) {
        id -> Uuid,
        name -> Text,
        province -> Text,
        region -> Text,
    }
}

diesel::table! {
    events (id) {
        id -> Uuid,
        organizer_id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        /// One of `hiking`, `mtb`, `road_bike`, `running`, `trail_run`.
        event_type -> Text,
        /// One of `draft`, `published`, `completed`, `cancelled`.
        status -> Text,
        location -> Text,
        starts_at -> Timestamptz,
        ends_at -> Nullable<Timestamptz>,
        price -> Int4,
        max_participants -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    event_mountains (event_id, mountain_id) {
        event_id -> Uuid,
        mountain_id -> Uuid,
    }
}

diesel::table! {
    /// At most one review per user per event.
    event_reviews (id) {
        id -> Uuid,
        event_id -> Uuid,
        user_id -> Uuid,
        rating -> Int2,
        body -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    bookings (id) {
        id -> Uuid,
        event_id -> Uuid,
        user_id -> Uuid,
        status -> Text,
        payment_status -> Text,
        payment_method -> Nullable<Text>,
        booked_at -> Timestamptz,
    }
}

diesel::table! {
    booking_companions (id) {
        id -> Uuid,
        booking_id -> Uuid,
        full_name -> Text,
        checked_in_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Attendance of booking holders; the key forbids double check-in.
    event_checkins (event_id, user_id) {
        event_id -> Uuid,
        user_id -> Uuid,
        method -> Text,
        checked_in_at -> Timestamptz,
    }
}

diesel::table! {
    badges (id) {
        id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        image_url -> Nullable<Text>,
        criteria_key -> Nullable<Text>,
    }
}

diesel::table! {
    user_badges (user_id, badge_id) {
        user_id -> Uuid,
        badge_id -> Uuid,
        awarded_at -> Timestamptz,
    }
}

diesel::table! {
    avatar_borders (id) {
        id -> Uuid,
        slug -> Text,
        name -> Text,
        description -> Nullable<Text>,
        tier -> Text,
        criteria_type -> Text,
        criteria_value -> Jsonb,
        sort_order -> Int4,
    }
}

diesel::table! {
    user_avatar_borders (user_id, border_id) {
        user_id -> Uuid,
        border_id -> Uuid,
        awarded_at -> Timestamptz,
    }
}

diesel::table! {
    user_follows (follower_id, following_id) {
        follower_id -> Uuid,
        following_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    feed_reactions (user_id, activity_id) {
        user_id -> Uuid,
        activity_id -> Uuid,
        kind -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    feed_comments (id) {
        id -> Uuid,
        activity_id -> Uuid,
        user_id -> Uuid,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(organizer_profiles -> users (user_id));
diesel::joinable!(events -> organizer_profiles (organizer_id));
diesel::joinable!(event_mountains -> events (event_id));
diesel::joinable!(event_mountains -> mountains (mountain_id));
diesel::joinable!(event_reviews -> events (event_id));
diesel::joinable!(bookings -> events (event_id));
diesel::joinable!(booking_companions -> bookings (booking_id));
diesel::joinable!(event_checkins -> events (event_id));
diesel::joinable!(user_badges -> badges (badge_id));
diesel::joinable!(user_avatar_borders -> avatar_borders (border_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    organizer_profiles,
    mountains,
    events,
    event_mountains,
    event_reviews,
    bookings,
    booking_companions,
    event_checkins,
    badges,
    user_badges,
    avatar_borders,
    user_avatar_borders,
    user_follows,
    feed_reactions,
    feed_comments,
);
