//! Reorder Engine for groupmark.
//!
//! Turns a completed drag gesture into a new listing. Pure: the input listing
//! is never mutated and nothing is persisted here.

use crate::types::bookmark::Listing;
use crate::types::errors::ReorderError;
use crate::types::reorder::{BookmarkSlot, DragResult};

/// Applies `gesture` to `listing` and returns the reordered copy.
///
/// A gesture without a destination returns the listing unchanged.
pub fn reorder(listing: &Listing, gesture: &DragResult) -> Result<Listing, ReorderError> {
    let mut next = listing.clone();
    match gesture {
        DragResult::Group { destination: None, .. }
        | DragResult::Bookmark { destination: None, .. } => {}
        DragResult::Group {
            source,
            destination: Some(dest),
        } => move_within(&mut next.groups, *source, *dest)?,
        DragResult::Bookmark {
            source,
            destination: Some(dest),
        } => move_bookmark(&mut next, source, dest)?,
    }
    Ok(next)
}

fn move_bookmark(
    listing: &mut Listing,
    source: &BookmarkSlot,
    dest: &BookmarkSlot,
) -> Result<(), ReorderError> {
    let from = listing
        .group_index(&source.group_id)
        .ok_or_else(|| ReorderError::UnknownGroup(source.group_id.clone()))?;
    let to = listing
        .group_index(&dest.group_id)
        .ok_or_else(|| ReorderError::UnknownGroup(dest.group_id.clone()))?;

    if from == to {
        return move_within(&mut listing.groups[from].bookmarks, source.index, dest.index);
    }

    let bookmarks = &mut listing.groups[from].bookmarks;
    if source.index >= bookmarks.len() {
        return Err(ReorderError::SourceOutOfRange {
            index: source.index,
            len: bookmarks.len(),
        });
    }
    let moved = bookmarks.remove(source.index);

    let target = &mut listing.groups[to].bookmarks;
    let at = dest.index.min(target.len());
    target.insert(at, moved);
    Ok(())
}

/// Remove-then-insert on one sequence; `dest` is read against the
/// post-removal sequence and clamped to its end.
fn move_within<T>(items: &mut Vec<T>, source: usize, dest: usize) -> Result<(), ReorderError> {
    if source >= items.len() {
        return Err(ReorderError::SourceOutOfRange {
            index: source,
            len: items.len(),
        });
    }
    if source == dest {
        return Ok(());
    }
    let item = items.remove(source);
    let at = dest.min(items.len());
    items.insert(at, item);
    Ok(())
}
