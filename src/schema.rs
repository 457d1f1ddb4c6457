table! {
    fund_strategies (id) {
        id -> Uuid,
        strategy -> Jsonb,
        created_at -> Timestamptz,
    }
}

table! {
    token_deployments (id) {
        id -> Uuid,
        token_address -> Varchar,
        admin_address -> Varchar,
        token_name -> Varchar,
        token_symbol -> Varchar,
        deployer_address -> Varchar,
        pool_id -> Varchar,
        paired_token -> Varchar,
        locker -> Varchar,
        mev_module -> Varchar,
        pool_hook -> Varchar,
        starting_tick -> Numeric,
        token_metadata -> Text,
        token_image -> Text,
        token_context -> Text,
        extensions_supply -> Numeric,
        extensions -> Array<Text>,
        network -> Varchar,
        deployment_block_number -> Int8,
        deployment_tx_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

allow_tables_to_appear_in_same_query!(
    fund_strategies,
    token_deployments,
);
