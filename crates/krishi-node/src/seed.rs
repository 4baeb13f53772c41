//! Demo accounts for local development.

use krishi_core::Customer;

use crate::state::{Account, AppState};

/// Bearer token of the demo buyer.
pub const DEMO_BUYER_TOKEN: &str = "demo-buyer-token";

/// Bearer token of the demo seller.
pub const DEMO_SELLER_TOKEN: &str = "demo-seller-token";

/// Shop id of the demo seller, to use as `seller` on draft lines.
pub const DEMO_SHOP_ID: &str = "shop1";

/// Register the demo buyer and seller.
pub async fn seed_demo_accounts(state: &AppState) {
    state
        .register_account(
            DEMO_BUYER_TOKEN,
            Account::buyer(
                "buyer1",
                Customer::new("Rajesh Kumar", "rajesh@example.com").with_phone("9876543210"),
            ),
        )
        .await;

    state
        .register_account(
            DEMO_SELLER_TOKEN,
            Account::seller(
                DEMO_SHOP_ID,
                Customer::new("Krishna Farms", "krishna.farms@example.com"),
            ),
        )
        .await;

    tracing::info!(
        buyer_token = DEMO_BUYER_TOKEN,
        seller_token = DEMO_SELLER_TOKEN,
        "Seeded demo accounts"
    );
}
