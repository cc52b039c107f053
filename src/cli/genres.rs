use tabled::Table;

use crate::{
    beatport::CatalogClient,
    cli::{Context, OutputFormat},
    error, utils,
};

pub async fn genres(format: OutputFormat) {
    let ctx = match Context::new(format) {
        Ok(ctx) => ctx,
        Err(e) => error!("Cannot create HTTP session. Err: {}", e),
    };

    let token = match ctx.token().await {
        Ok(token) => token,
        Err(e) => error!("Authentication failed: {}", e),
    };

    let pb = ctx.spinner("Fetching genres...");
    let result = CatalogClient::new(&ctx.transport, &ctx.endpoints, &token)
        .list_genres()
        .await;
    pb.finish_and_clear();

    let mut genres = match result {
        Ok(genres) => genres,
        Err(e) => error!("Error fetching genres: {}", e),
    };

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&genres) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Error encoding JSON: {}", e),
        },
        OutputFormat::Csv => print!("{}", utils::format_genres_csv(&genres)),
        OutputFormat::Text => {
            utils::sort_genres_by_name(&mut genres);
            println!("{}", Table::new(utils::genre_table_rows(&genres)));
        }
    }
}
