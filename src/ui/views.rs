//! Pure view functions
//!
//! Each function maps a piece of state to an HTML string. None of them
//! touch anything but their arguments, so the same input always yields
//! byte-identical markup.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::state::{ApplicationState, Photo, RoverInfo, RoverName};

/// Heading text shown above the selector
pub const PAGE_TITLE: &str = "mars dashboard";

/// Id of the rover `<select>`; the page script listens for its change events
pub const SELECTOR_ID: &str = "roverSelect";

/// Upper-cased page heading
pub fn render_title(text: &str) -> String {
    format!(
        r#"<h1 class="text-center py-3">{}</h1>"#,
        encode_text(&text.to_uppercase())
    )
}

/// Rover dropdown
///
/// Exactly one option is marked `selected`: the disabled placeholder when
/// nothing is selected yet, otherwise the selected rover.
pub fn render_rover_selector(rovers: &[RoverName], selected: Option<RoverName>) -> String {
    let placeholder = if selected.is_none() { " selected" } else { "" };
    let rover_options: String = rovers
        .iter()
        .map(|rover| {
            let marker = if selected == Some(*rover) { " selected" } else { "" };
            format!(
                r#"<option value="{value}"{marker}>{label}</option>"#,
                value = encode_double_quoted_attribute(rover.as_str()),
                label = encode_text(rover.as_str()),
            )
        })
        .collect();

    format!(
        concat!(
            r#"<div id="selectorContainer" class="row mt-5 mb-3">"#,
            r#"<div class="col-md-4">"#,
            r#"<label for="{id}" class="form-label">Rover</label>"#,
            r#"<select class="form-select" id="{id}" name="rover" aria-label="Select a rover">"#,
            r#"<option value="" disabled{placeholder}>Select a rover</option>"#,
            "{rover_options}",
            "</select>",
            "</div>",
            "</div>"
        ),
        id = SELECTOR_ID,
        placeholder = placeholder,
        rover_options = rover_options,
    )
}

/// Mission summary card, or nothing at all until every field is known
pub fn render_rover_info(info: &RoverInfo) -> String {
    if !info.is_present() {
        return String::new();
    }

    format!(
        concat!(
            r#"<div class="col-md-4">"#,
            r#"<div class="card rover-info">"#,
            r#"<div class="card-body">"#,
            r#"<h5 class="card-title">Mission</h5>"#,
            r#"<p class="card-text">Launch Date: {launch}</p>"#,
            r#"<p class="card-text">Landing Date: {landing}</p>"#,
            r#"<p class="card-text">Status: {status}</p>"#,
            "</div>",
            "</div>",
            "</div>"
        ),
        launch = encode_text(&info.launch_date),
        landing = encode_text(&info.landing_date),
        status = encode_text(&info.status),
    )
}

/// Single gallery card
fn render_photo_card(photo: &Photo, title: &str) -> String {
    format!(
        concat!(
            r#"<div class="card photo-card col-3 m-2">"#,
            r#"<img src="{src}" class="card-img-top" alt="{alt}">"#,
            r#"<div class="card-body">"#,
            r#"<h5 class="card-title">{title}</h5>"#,
            r#"<p class="card-text">Taken by the {camera} camera on {date}</p>"#,
            "</div>",
            "</div>"
        ),
        src = encode_double_quoted_attribute(&photo.src),
        alt = encode_double_quoted_attribute(&format!("{} photo", photo.camera.name)),
        title = encode_text(title),
        camera = encode_text(&photo.camera.name),
        date = photo.date.format("%Y-%m-%d"),
    )
}

/// Photo gallery: one card per photo, labelled "Photo #1", "Photo #2", ...
pub fn render_photo_gallery(photos: &[Photo]) -> String {
    let cards: String = photos
        .iter()
        .enumerate()
        .map(|(i, photo)| render_photo_card(photo, &format!("Photo #{}", i + 1)))
        .collect();

    format!(
        concat!(
            r#"<section class="gallery container">"#,
            r#"<div class="container text-center">"#,
            r#"<div class="row align-items-center">"#,
            "{cards}",
            "</div>",
            "</div>",
            "</section>"
        ),
        cards = cards,
    )
}

/// The whole dashboard: title, selector, info card, gallery
pub fn compose_app(state: &ApplicationState) -> String {
    let mut markup = render_title(PAGE_TITLE);
    markup.push_str(&render_rover_selector(state.rovers(), state.selected_rover()));
    markup.push_str(&render_rover_info(state.rover()));
    markup.push_str(&render_photo_gallery(state.photos()));
    markup
}
