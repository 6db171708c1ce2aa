use std::fmt::Debug;

use include_dir::{include_dir, Dir, File};
use lazy_static::*;
use serde::Serialize;
use tera::Tera;

pub use line_race::*;
pub use overall::*;
pub use points_race::*;
pub use raw::*;
pub use segment::*;
pub use status::*;
pub use time_trial::*;

mod line_race;
mod overall;
mod points_race;
mod raw;
mod segment;
mod status;
mod time_trial;

/// A display-ready result table. Boards carry nothing but display
/// strings: every sorting rule and placeholder policy is applied when
/// a board is built, so the templates stay dumb.
pub trait Board
where
    Self: Serialize + Sized + Debug,
{
    /// Must be a file name ending in `.html.j2`, located in
    /// `src/res/boards/`.
    const FILE: &'static str;

    /// Render the template file with this board as its context.
    fn render(&self) -> String {
        log::debug!("render board context: {:?}", &self);

        let ctx = tera::Context::from_serialize(self).expect("failed to create board context!");
        TEMPLATES
            .render(Self::FILE, &ctx)
            .expect("failed to render board!")
    }
}

lazy_static! {
    static ref TEMPLATES: Tera = collect_templates().unwrap();
}

fn collect_templates() -> tera::Result<Tera> {
    // Include all board templates at compile-time:
    static TEMPLATE_DIR: Dir = include_dir!("src/res/boards/");

    let mut tera = Tera::default();

    let add_from_file = |tera: &mut Tera, file: &File| {
        let file_name = file.path().to_str().expect("failed to read template");
        tera.add_raw_template(
            file_name,
            file.contents_utf8().expect("failed to read template"),
        )
    };

    let add_from_name = |tera: &mut Tera, file_name: &str| {
        let file = TEMPLATE_DIR
            .get_file(file_name)
            .expect("failed to find template");
        add_from_file(tera, &file)
    };

    // Add the base template first, because the others extend it.
    add_from_name(&mut tera, "base.html.j2")?;

    // Add all other templates.
    for file in TEMPLATE_DIR.files() {
        add_from_file(&mut tera, file)?;
    }

    Ok(tera)
}

/// Column header of a segment, f.e. `Spurt [2]`.
pub(self) fn segment_label(name: &str, repeat: u32) -> String {
    format!("{} [{}]", name, repeat)
}

/// Uppercase the first letter, as the route parameters arrive
/// lowercased, f.e. `herrer` -> `Herrer`.
pub(self) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(self) const DASH: &str = "-";
