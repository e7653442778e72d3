//! Diesel table definitions. Mirrors `migrations/`.

diesel::table! {
    trades (id) {
        id -> Nullable<Integer>,
        trade_id -> Text,
        owner_id -> Text,
        owner_name -> Text,
        symbol -> Text,
        direction -> Text,
        entry_price -> Text,
        quantity -> BigInt,
        entry_timestamp -> Text,
        stop_loss -> Nullable<Text>,
        take_profit -> Nullable<Text>,
        reason -> Text,
        setup_type -> Nullable<Text>,
        risk_amount -> Nullable<Text>,
        commission -> Text,
        market_price_at_entry -> Nullable<Text>,
        status -> Text,
        exit_price -> Nullable<Text>,
        exit_timestamp -> Nullable<Text>,
        exit_reason -> Nullable<Text>,
        pnl -> Nullable<Text>,
        pnl_percent -> Nullable<Text>,
        market_price_at_exit -> Nullable<Text>,
        created_at -> Text,
    }
}
