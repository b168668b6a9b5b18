//! Reading embedded metadata with `lofty`.
//!
//! Failures are silent: a file without readable tags simply has no cover
//! and no tagged duration.

use std::path::Path;
use std::time::Duration;

use lofty::picture::{Picture, PictureType};
use lofty::prelude::{AudioFile, TaggedFileExt};

/// The embedded cover image bytes, front cover preferred.
pub fn cover_art(path: &Path) -> Option<Vec<u8>> {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            log::debug!("no tags for {}: {e}", path.display());
            return None;
        }
    };
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;
    pick_cover(tag.pictures()).map(|p| p.data().to_vec())
}

fn pick_cover(pictures: &[Picture]) -> Option<&Picture> {
    pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
}

/// Playing time from the stream properties.
pub fn duration(path: &Path) -> Option<Duration> {
    let tagged = lofty::read_from_path(path).ok()?;
    let d = tagged.properties().duration();
    (!d.is_zero()).then_some(d)
}
