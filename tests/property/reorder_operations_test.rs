//! Property-based tests for the reorder engine.
//!
//! These tests verify that same-position drops are the identity, that a move
//! followed by the reverse move restores the listing, and that cross-group
//! moves transfer exactly one bookmark.

use groupmark::services::reorder_engine::reorder;
use groupmark::types::bookmark::{Bookmark, Group, Listing};
use groupmark::types::reorder::{BookmarkSlot, DragResult};
use proptest::prelude::*;

/// Strategy for a listing of 1..6 groups with 0..8 bookmarks each and globally unique IDs.
fn arb_listing() -> impl Strategy<Value = Listing> {
    prop::collection::vec(0usize..8, 1..6).prop_map(|sizes| {
        let mut next_id = 0;
        let groups = sizes
            .iter()
            .enumerate()
            .map(|(g, &size)| Group {
                id: format!("g{}", g),
                name: format!("Group {}", g),
                bookmarks: (0..size)
                    .map(|_| {
                        next_id += 1;
                        Bookmark {
                            id: format!("b{}", next_id),
                            title: format!("Bookmark {}", next_id),
                            url: format!("https://site{}.example", next_id),
                            description: None,
                            created_at: String::new(),
                        }
                    })
                    .collect(),
            })
            .collect();
        Listing::new(groups)
    })
}

/// A listing plus a group index and two in-range positions inside it.
fn arb_listing_with_move() -> impl Strategy<Value = (Listing, usize, usize, usize)> {
    arb_listing()
        .prop_filter("needs a non-empty group", |l| {
            l.groups.iter().any(|g| !g.bookmarks.is_empty())
        })
        .prop_flat_map(|listing| {
            let candidates: Vec<usize> = listing
                .groups
                .iter()
                .enumerate()
                .filter(|(_, g)| !g.bookmarks.is_empty())
                .map(|(i, _)| i)
                .collect();
            let lens: Vec<usize> = listing.groups.iter().map(|g| g.bookmarks.len()).collect();
            (Just(listing), prop::sample::select(candidates)).prop_flat_map(move |(l, gi)| {
                let len = lens[gi];
                (Just(l), Just(gi), 0..len, 0..len)
            })
        })
}

fn slot(listing: &Listing, group: usize, index: usize) -> BookmarkSlot {
    BookmarkSlot::new(listing.groups[group].id.clone(), index)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn same_position_drop_is_identity((listing, gi, i, _j) in arb_listing_with_move()) {
        let gesture = DragResult::Bookmark {
            source: slot(&listing, gi, i),
            destination: Some(slot(&listing, gi, i)),
        };
        prop_assert_eq!(reorder(&listing, &gesture).unwrap(), listing);
    }

    #[test]
    fn move_then_move_back_restores((listing, gi, i, j) in arb_listing_with_move()) {
        let forward = DragResult::Bookmark {
            source: slot(&listing, gi, i),
            destination: Some(slot(&listing, gi, j)),
        };
        let back = DragResult::Bookmark {
            source: slot(&listing, gi, j),
            destination: Some(slot(&listing, gi, i)),
        };
        let moved = reorder(&listing, &forward).unwrap();
        let moved_id = &listing.groups[gi].bookmarks[i].id;
        prop_assert_eq!(&moved.groups[gi].bookmarks[j].id, moved_id);

        let restored = reorder(&moved, &back).unwrap();
        prop_assert_eq!(restored, listing);
    }

    #[test]
    fn group_move_then_back_restores(
        listing in arb_listing(),
        a in 0usize..6,
        b in 0usize..6,
    ) {
        let n = listing.groups.len();
        let (a, b) = (a % n, b % n);
        let moved = reorder(&listing, &DragResult::Group { source: a, destination: Some(b) }).unwrap();
        prop_assert_eq!(moved.bookmark_count(), listing.bookmark_count());
        let restored = reorder(&moved, &DragResult::Group { source: b, destination: Some(a) }).unwrap();
        prop_assert_eq!(restored, listing);
    }

    #[test]
    fn cross_group_move_transfers_one_bookmark(
        (listing, gi, i, _j) in arb_listing_with_move(),
        target in 0usize..6,
        dest_index in 0usize..10,
    ) {
        let n = listing.groups.len();
        prop_assume!(n > 1);
        let mut ti = target % n;
        if ti == gi {
            ti = (ti + 1) % n;
        }

        let moved_id = listing.groups[gi].bookmarks[i].id.clone();
        let gesture = DragResult::Bookmark {
            source: slot(&listing, gi, i),
            destination: Some(slot(&listing, ti, dest_index)),
        };
        let next = reorder(&listing, &gesture).unwrap();

        prop_assert_eq!(next.groups[gi].bookmarks.len(), listing.groups[gi].bookmarks.len() - 1);
        prop_assert_eq!(next.groups[ti].bookmarks.len(), listing.groups[ti].bookmarks.len() + 1);
        let (owner, _) = next.find_bookmark(&moved_id).unwrap();
        prop_assert_eq!(owner, listing.groups[ti].id.as_str());
        prop_assert_eq!(next.bookmark_count(), listing.bookmark_count());
        prop_assert!(next.validate_ids().is_ok());
    }
}
