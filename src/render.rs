//! Plain-text rendering of feed snapshots.

use std::fmt::Write;

use flickrer_core::models::DisplaySettings;
use flickrer_core::{FeedState, Photo};

/// Build the display URL of a photo from the configured template.
pub fn display_url(template: &str, photo: &Photo) -> String {
    template
        .replace("{server}", &photo.server)
        .replace("{id}", &photo.id)
        .replace("{secret}", &photo.secret)
}

/// One-line summary of the feed status.
pub fn status_line(state: &FeedState) -> String {
    let filter = match (state.search_text(), state.selected_tags()) {
        (Some(text), _) => format!("search \"{}\"", text),
        (None, []) => "recent".to_string(),
        (None, tags) => format!("tags {}", tags.join(", ")),
    };

    let mut line = format!("[{}] {} photos, page {}", filter, state.photos.len(), state.page);
    if state.is_loading {
        line.push_str(", loading...");
    }
    if let Some(error) = &state.error {
        let _ = write!(line, ", {}", error);
    }
    line
}

/// Full listing: status line, then one line per photo. Expanded photos
/// also show their display URL and tags.
pub fn render_feed(state: &FeedState, display: &DisplaySettings) -> String {
    let mut out = status_line(state);

    for photo in &state.photos {
        let marker = if photo.expanded { '-' } else { '+' };
        let title = if photo.title.is_empty() { "(untitled)" } else { photo.title.as_str() };
        let _ = write!(out, "\n{} {:<14} {}", marker, photo.id, title);

        if !photo.expanded {
            continue;
        }

        let _ = write!(out, "\n    {}", display_url(&display.url_template, photo));
        match &photo.tags {
            None => out.push_str("\n    tags: loading..."),
            Some(tags) if tags.is_empty() => out.push_str("\n    tags: none"),
            Some(tags) => {
                let names: Vec<&str> = tags.iter().map(|t| t.content.as_str()).collect();
                let _ = write!(out, "\n    tags: {}", names.join(" "));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use flickrer_core::Tag;
    use std::sync::Arc;

    fn photo(id: &str, title: &str) -> Photo {
        Photo {
            server: "65535".to_string(),
            secret: "abc".to_string(),
            ..Photo::new(id, title)
        }
    }

    #[test]
    fn test_display_url_default_template() {
        let display = DisplaySettings::default();
        assert_eq!(
            display_url(&display.url_template, &photo("42", "x")),
            "https://live.staticflickr.com/65535/42_abc.jpg"
        );
    }

    #[test]
    fn test_status_line_variants() {
        let mut state = FeedState::default();
        assert_eq!(status_line(&state), "[recent] 0 photos, page 0");

        state.filters.selected_tags = vec!["cat".to_string(), "dog".to_string()];
        state.is_loading = true;
        assert_eq!(status_line(&state), "[tags cat, dog] 0 photos, page 0, loading...");

        state.filters.search_text = Some("sea".to_string());
        state.is_loading = false;
        state.error = Some("HTTP 500".to_string());
        assert_eq!(status_line(&state), "[search \"sea\"] 0 photos, page 0, HTTP 500");
    }

    #[test]
    fn test_render_expanded_photo() {
        let collapsed = photo("1", "");
        let expanded = Photo {
            expanded: true,
            ..photo("2", "Harbour")
        }
        .with_tags(vec![Tag::new("t1", "boats"), Tag::new("t2", "sea")]);
        let state = FeedState {
            photos: vec![Arc::new(collapsed), Arc::new(expanded)],
            ..FeedState::default()
        };

        let out = render_feed(&state, &DisplaySettings::default());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("+ 1"));
        assert!(lines[1].ends_with("(untitled)"));
        assert!(lines[2].starts_with("- 2"));
        assert_eq!(lines[3].trim(), "https://live.staticflickr.com/65535/2_abc.jpg");
        assert_eq!(lines[4].trim(), "tags: boats sea");
    }

    #[test]
    fn test_render_pending_tags() {
        let state = FeedState {
            photos: vec![Arc::new(Photo {
                expanded: true,
                ..photo("3", "t")
            })],
            ..FeedState::default()
        };
        let out = render_feed(&state, &DisplaySettings::default());
        assert!(out.ends_with("tags: loading..."));
    }
}
