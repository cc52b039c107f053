use crate::{
    cli::{Context, OutputFormat},
    error, info,
    management::TokenManager,
    success,
};

pub async fn auth(force: bool) {
    let ctx = match Context::new(OutputFormat::Text) {
        Ok(ctx) => ctx,
        Err(e) => error!("Cannot create HTTP session. Err: {}", e),
    };

    if force {
        if let Err(e) = ctx.tokens.clear().await {
            error!("Cannot remove cached token. Err: {}", e);
        }
    }

    match ctx.tokens.load().await {
        Ok(Some(_)) => {
            info!("Using cached token. Run bpcli auth --force to log in again.");
            return;
        }
        Ok(None) => {}
        Err(e) => error!("Cached token is unreadable. Run bpcli logout.\n Error: {}", e),
    }

    if let Err(e) = ctx.token().await {
        error!("Authentication failed: {}", e);
    }
}

pub async fn logout() {
    let tokens = TokenManager::new();
    match tokens.clear().await {
        Ok(true) => success!("Removed cached token."),
        Ok(false) => info!("No cached token at {}.", tokens.path().display()),
        Err(e) => error!("Cannot remove cached token. Err: {}", e),
    }
}
