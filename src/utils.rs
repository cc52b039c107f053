use crate::types::{Genre, GenreTableRow, RankedTrackList, Track};

/// Finds a genre by name, ignoring case and surrounding whitespace.
pub fn find_genre<'a>(genres: &'a [Genre], name: &str) -> Option<&'a Genre> {
    let name = name.trim().to_lowercase();
    genres
        .iter()
        .find(|g| g.name.trim().to_lowercase() == name)
}

pub fn sort_genres_by_name(genres: &mut [Genre]) {
    genres.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}

pub fn genre_table_rows(genres: &[Genre]) -> Vec<GenreTableRow> {
    genres
        .iter()
        .map(|g| GenreTableRow {
            id: g.id,
            name: g.name.clone(),
            slug: g.slug.clone(),
        })
        .collect()
}

/// `"{rank}. {artists} - {name} ({mix})"`, one line per track.
pub fn format_track_line(rank: usize, track: &Track) -> String {
    format!(
        "{rank}. {artists} - {name} ({mix})",
        rank = rank,
        artists = track.artist_names(),
        name = track.name,
        mix = track.mix_name
    )
}

pub fn format_tracks_text(list: &RankedTrackList) -> String {
    list.tracks
        .iter()
        .enumerate()
        .map(|(i, t)| format_track_line(i + 1, t))
        .collect::<Vec<_>>()
        .join("\n")
}

/// CSV with the primary artist only; tracks without artists get an empty cell.
pub fn format_tracks_csv(tracks: &[Track]) -> String {
    let mut out = String::from("Artist,Title,Mix Name\n");
    for track in tracks {
        let artist = track
            .primary_artist()
            .map(|a| a.name.as_str())
            .unwrap_or_default();
        out.push_str(&format!(
            "{},{},{}\n",
            csv_field(artist),
            csv_field(&track.name),
            csv_field(&track.mix_name)
        ));
    }
    out
}

pub fn format_genres_csv(genres: &[Genre]) -> String {
    let mut out = String::from("ID,Name,Slug\n");
    for genre in genres {
        out.push_str(&format!(
            "{},{},{}\n",
            genre.id,
            csv_field(&genre.name),
            csv_field(&genre.slug)
        ));
    }
    out
}

/// Quotes a CSV cell when it contains a separator, quote or line break.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
