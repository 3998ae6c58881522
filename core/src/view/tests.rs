use super::*;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

mod common {
    use super::*;

    pub(super) fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    pub(super) fn note(title: &str, updated: u64) -> Note {
        let mut note = Note::new(title.to_string(), String::new(), at(updated));
        note.updated_at = at(updated);
        note
    }

    pub(super) fn titles(view: &[&Note]) -> Vec<String> {
        view.iter().map(|n| n.title.clone()).collect()
    }

    /// One note in each state: active, pinned, archived, deleted, archived+deleted.
    pub(super) fn mixed_notes() -> Vec<Note> {
        let active = note("active", 1);

        let mut pinned = note("pinned", 2);
        pinned.is_pinned = true;

        let mut archived = note("archived", 3);
        archived.is_archived = true;

        let mut deleted = note("deleted", 4);
        deleted.is_deleted = true;

        let mut both = note("archived-deleted", 5);
        both.is_archived = true;
        both.is_deleted = true;

        vec![active, pinned, archived, deleted, both]
    }
}

mod section_filter {
    use super::common::*;
    use super::*;

    #[test]
    fn test_notes_section_shows_only_active() {
        let notes = mixed_notes();

        let view = derive(&notes, &ViewFilter::section(Section::Notes));

        assert_eq!(titles(&view), vec!["pinned", "active"]);
    }

    #[test]
    fn test_archive_section_excludes_trash() {
        let notes = mixed_notes();

        let view = derive(&notes, &ViewFilter::section(Section::Archive));

        assert_eq!(titles(&view), vec!["archived"]);
    }

    #[test]
    fn test_trash_section_includes_archived_trash() {
        let notes = mixed_notes();

        let view = derive(&notes, &ViewFilter::section(Section::Trash));

        assert_eq!(titles(&view), vec!["archived-deleted", "deleted"]);
    }

    #[test]
    fn test_labels_section_with_label() {
        let mut notes = mixed_notes();
        for n in notes.iter_mut() {
            n.labels = vec!["work".to_string()];
        }
        notes[0].labels = vec!["home".to_string()];

        let view = derive(
            &notes,
            &ViewFilter::section(Section::Labels).with_label("work"),
        );

        assert_eq!(titles(&view), vec!["pinned"]);
    }

    #[test]
    fn test_labels_section_without_label_behaves_like_notes() {
        let notes = mixed_notes();

        let view = derive(&notes, &ViewFilter::section(Section::Labels));

        assert_eq!(titles(&view), vec!["pinned", "active"]);
    }

    #[test]
    fn test_label_is_ignored_outside_labels_section() {
        let notes = mixed_notes();

        let view = derive(
            &notes,
            &ViewFilter::section(Section::Notes).with_label("nothing-has-this"),
        );

        assert_eq!(view.len(), 2);
    }
}

mod search {
    use super::common::*;
    use super::*;

    #[test]
    fn test_search_is_case_insensitive_over_title_content_and_labels() {
        let mut by_title = note("Shopping LIST", 1);
        by_title.content = "x".into();
        let mut by_content = note("b", 2);
        by_content.content = "the list of things".into();
        let mut by_label = note("c", 3);
        by_label.labels = vec!["Lists".into()];
        let miss = note("d", 4);
        let notes = vec![by_title, by_content, by_label, miss];

        let view = derive(&notes, &ViewFilter::default().with_query("LiSt"));

        assert_eq!(titles(&view), vec!["c", "b", "Shopping LIST"]);
    }

    #[test]
    fn test_search_is_plain_substring() {
        let notes = vec![note("meeting at 3pm", 1)];

        assert_eq!(
            derive(&notes, &ViewFilter::default().with_query("ting at")).len(),
            1
        );
        assert_eq!(
            derive(&notes, &ViewFilter::default().with_query("meet 3pm")).len(),
            0
        );
    }

    #[test]
    fn test_search_applies_after_section_filter() {
        let notes = mixed_notes();

        let view = derive(
            &notes,
            &ViewFilter::section(Section::Notes).with_query("deleted"),
        );

        assert!(view.is_empty());
    }

    #[test]
    fn test_markup_is_searched_as_raw_text() {
        let notes = vec![note("**bold** idea", 1)];

        let view = derive(&notes, &ViewFilter::default().with_query("**bold**"));

        assert_eq!(view.len(), 1);
    }
}

mod sort {
    use super::common::*;
    use super::*;

    #[test]
    fn test_pinned_beats_recency() {
        let mut old_pinned = note("old-pinned", 1);
        old_pinned.is_pinned = true;
        let notes = vec![note("new", 100), old_pinned, note("mid", 50)];

        let view = derive(&notes, &ViewFilter::default());

        assert_eq!(titles(&view), vec!["old-pinned", "new", "mid"]);
    }

    #[test]
    fn test_pinned_group_sorted_by_update() {
        let mut a = note("a", 1);
        a.is_pinned = true;
        let mut b = note("b", 2);
        b.is_pinned = true;
        let mut archived_a = note("arch-a", 5);
        archived_a.is_archived = true;
        let mut archived_b = note("arch-b", 6);
        archived_b.is_archived = true;
        archived_b.is_pinned = true;
        let notes = vec![a, b, archived_a, archived_b];

        assert_eq!(
            titles(&derive(&notes, &ViewFilter::default())),
            vec!["b", "a"]
        );
        assert_eq!(
            titles(&derive(&notes, &ViewFilter::section(Section::Archive))),
            vec!["arch-b", "arch-a"]
        );
    }

    #[test]
    fn test_ties_keep_storage_order() {
        let notes = vec![note("first", 7), note("second", 7), note("third", 7)];

        let view = derive(&notes, &ViewFilter::default());

        assert_eq!(titles(&view), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_derive_leaves_input_untouched() {
        let notes = vec![note("old", 1), note("new", 2)];
        let before = notes.clone();

        let view = derive(&notes, &ViewFilter::default());

        assert_eq!(titles(&view), vec!["new", "old"]);
        assert_eq!(notes, before);
    }
}

mod labels {
    use super::common::*;
    use super::*;

    #[test]
    fn test_index_covers_every_state_without_duplicates() {
        let mut notes = mixed_notes();
        notes[0].labels = vec!["b".into(), "a".into(), "b".into()];
        notes[2].labels = vec!["archived-only".into()];
        notes[3].labels = vec!["trash-only".into(), "a".into()];

        let index = label_index(&notes);

        assert_eq!(index, vec!["a", "archived-only", "b", "trash-only"]);
    }

    #[test]
    fn test_index_independent_of_order() {
        let mut x = note("x", 1);
        x.labels = vec!["z".into(), "y".into()];
        let mut y = note("y", 2);
        y.labels = vec!["y".into(), "x".into()];

        let forward = label_index(&[x.clone(), y.clone()]);
        let backward = label_index(&[y, x]);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_empty_labels_are_kept() {
        let mut x = note("x", 1);
        x.labels = vec![String::new()];

        assert_eq!(label_index(&[x]), vec![String::new()]);
    }
}

#[test]
fn test_section_parse_and_display() {
    for section in Section::ALL {
        assert_eq!(section.to_string().parse::<Section>().unwrap(), section);
    }
    assert_eq!(
        "inbox".parse::<Section>(),
        Err(UnknownSection("inbox".to_string()))
    );
}
