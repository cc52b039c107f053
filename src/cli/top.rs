use tabled::Table;

use crate::{
    beatport::{CatalogClient, FallbackPolicy},
    cli::{Context, OutputFormat, prompt},
    error, info,
    types::RankedTrackList,
    utils, warning,
};

pub async fn top(genre: Option<String>, format: OutputFormat, lenient_fallback: bool) {
    let ctx = match Context::new(format) {
        Ok(ctx) => ctx,
        Err(e) => error!("Cannot create HTTP session. Err: {}", e),
    };

    let token = match ctx.token().await {
        Ok(token) => token,
        Err(e) => error!("Authentication failed: {}", e),
    };

    let genre_name = match genre {
        Some(name) => name,
        None => match prompt::line("Enter Genre (e.g. Techno): ") {
            Ok(name) => name,
            Err(e) => error!("{}", e),
        },
    };

    let fallback = if lenient_fallback {
        FallbackPolicy::AnyFailure
    } else {
        FallbackPolicy::NotFoundOnly
    };
    let catalog =
        CatalogClient::new(&ctx.transport, &ctx.endpoints, &token).with_fallback(fallback);

    let pb = ctx.spinner("Fetching genres...");
    let result = catalog.list_genres().await;
    pb.finish_and_clear();
    let mut genres = match result {
        Ok(genres) => genres,
        Err(e) => error!("Error fetching genres: {}", e),
    };

    let Some(selected) = utils::find_genre(&genres, &genre_name).cloned() else {
        utils::sort_genres_by_name(&mut genres);
        eprintln!(
            "Genre '{}' not found. Available genres:\n{}",
            genre_name,
            Table::new(utils::genre_table_rows(&genres))
        );
        error!("Please choose one of the available genres.");
    };

    if format.is_text() {
        info!(
            "Fetching Top 100 for {} (ID: {})...",
            selected.name, selected.id
        );
    }

    let pb = ctx.spinner("Fetching top tracks...");
    let result = catalog.top_tracks(selected.id).await;
    pb.finish_and_clear();
    let ranking = match result {
        Ok(ranking) => ranking,
        Err(e) => error!("Error fetching Top 100: {}", e),
    };

    print_ranking(&ranking, format);
}

fn print_ranking(ranking: &RankedTrackList, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&ranking.tracks) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Error encoding JSON: {}", e),
        },
        OutputFormat::Csv => print!("{}", utils::format_tracks_csv(&ranking.tracks)),
        OutputFormat::Text => {
            if ranking.is_approximate() {
                warning!("Top 100 chart unavailable, showing genre search results instead.");
            }
            println!("\nTop 100 Tracks:");
            println!("{}", utils::format_tracks_text(ranking));
        }
    }
}
