//! Renders a single entry's title and body as a small SVG preview card.
//! Everything about the card is a fixed constant except the background
//! color, which is drawn at random from a pastel range on every call.

use rand::Rng;

pub const WIDTH: u32 = 358;
pub const HEIGHT: u32 = 128;

const TITLE_FONT_SIZE: u32 = 12;
const CONTENT_FONT_SIZE: u32 = 13;
const TITLE_BAR_HEIGHT: u32 = 25;
const CONTENT_PADDING: u32 = 15;

/// The inclusive low end of each RGB channel. Keeping every channel at or
/// above this floor is what makes the draw pastel.
const CHANNEL_FLOOR: u8 = 180;

/// Draws a pastel `rgb(r,g,b)` color with each channel independently
/// uniform in `[180, 255]`.
pub fn random_pastel_color<R: Rng>(rng: &mut R) -> String {
    let r = rng.gen_range(CHANNEL_FLOOR..=u8::MAX);
    let g = rng.gen_range(CHANNEL_FLOOR..=u8::MAX);
    let b = rng.gen_range(CHANNEL_FLOOR..=u8::MAX);
    format!("rgb({},{},{})", r, g, b)
}

/// Renders the thumbnail with a fresh OS-seeded RNG. The color draw makes
/// this intentionally non-deterministic; nothing that needs reproducible
/// output should call it. Tests seed a `StdRng` and call [`render`]
/// directly.
pub fn render_default(title: &str, content: &str) -> String {
    render(title, content, &mut rand::thread_rng())
}

/// Renders one entry as SVG markup: a full-canvas pastel background, the
/// body text flowing through a `foreignObject` in the upper region, and a
/// semi-opaque title bar along the bottom with right-aligned title text.
/// Long content is allowed to overflow the canvas; there is no truncation.
pub fn render<R: Rng>(title: &str, content: &str, rng: &mut R) -> String {
    let bg_color = random_pastel_color(rng);
    let title = html_escape::encode_text(title);
    // The thumbnail flattens the body to a single line; the flow region
    // re-wraps it.
    let content = html_escape::encode_text(&content.replace('\n', " ")).into_owned();
    let content_width = WIDTH - 2 * CONTENT_PADDING;
    let content_height = HEIGHT - 2 * CONTENT_PADDING;

    format!(
        r#"<svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">
  <rect width="100%" height="100%" fill="{bg_color}" />
  <style>
    .title {{
      font-family: 'Hiragino Mincho Pro', 'Yu Mincho', serif;
      font-size: {title_font_size}px;
      fill: #333333;
      text-anchor: end;
      font-weight: bold;
      letter-spacing: 2px;
      dominant-baseline: middle;
    }}
    .title-bg {{
      fill: rgba(255, 255, 255, 0.9);
    }}
    foreignObject {{
      overflow: visible;
    }}
    .content {{
      font-family: 'Hiragino Mincho Pro', 'Yu Mincho', serif;
      font-size: {content_font_size}px;
      color: #333333;
      width: {content_width}px;
      word-wrap: break-word;
      white-space: pre-wrap;
      line-height: 1.4;
    }}
  </style>
  <foreignObject x="{padding}" y="10" width="{content_width}" height="{content_height}">
    <div xmlns="http://www.w3.org/1999/xhtml" class="content">{content}</div>
  </foreignObject>
  <rect x="0" y="{title_bar_y}" width="{width}" height="{title_bar_height}" class="title-bg" />
  <text x="{title_x}" y="{title_y}" class="title">{title}</text>
</svg>"#,
        width = WIDTH,
        height = HEIGHT,
        bg_color = bg_color,
        title_font_size = TITLE_FONT_SIZE,
        content_font_size = CONTENT_FONT_SIZE,
        content_width = content_width,
        content_height = content_height,
        padding = CONTENT_PADDING,
        title_bar_y = HEIGHT - TITLE_BAR_HEIGHT,
        title_bar_height = TITLE_BAR_HEIGHT,
        title_x = WIDTH - 10,
        title_y = HEIGHT - 12,
        content = content,
        title = title,
    )
}
