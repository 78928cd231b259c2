use crate::domain::{BilingualText, Direction, DocumentKind, Locale, Page, Testimonial};
use crate::editor::{ContentEditor, EditAction, EditorError, SectionPatch};
use crate::seed;
use crate::services::ContentService;
use crate::tests::mocks::{seeded_store, service_with};
use std::sync::Arc;

async fn setup_editor() -> (ContentEditor, Arc<ContentService>) {
    let service = service_with(seeded_store().await, None);
    (ContentEditor::new(service.clone()), service)
}

fn section_ids(page: &Page) -> Vec<String> {
    page.sections.iter().map(|s| s.id.clone()).collect()
}

// open, add a section, save: the store holds the new section and the
// version moves forward
#[tokio::test]
async fn test_edit_and_save_page() {
    let (editor, service) = setup_editor().await;

    let mut session = editor.open_page("home").await.unwrap();
    assert_eq!(session.loaded_version(), 0);

    let new_id = session.add_section(
        BilingualText::new("Partenaires", "الشركاء"),
        BilingualText::new("Nos partenaires", "شركاؤنا"),
    );
    let version = editor.save_page(&mut session).await.unwrap();

    assert_eq!(version, 1);
    assert_eq!(session.loaded_version(), 1);

    let stored = service.store().get_document::<Page>("home").await.unwrap();
    assert_eq!(stored.sections.last().map(|s| s.id.clone()), Some(new_id));
    assert!(stored.last_modified.is_some());

    let edits = editor.recent_edits().await;
    assert_eq!(edits[0].id, "home");
    assert_eq!(edits[0].action, EditAction::Saved);
}

// an incomplete translation blocks the save and leaves storage alone
#[tokio::test]
async fn test_validation_blocks_save() {
    let (editor, service) = setup_editor().await;
    let before = service.store().get_document::<Page>("home").await.unwrap();

    let mut session = editor.open_page("home").await.unwrap();
    session.set_title(Locale::Ar, "");

    match editor.save_page(&mut session).await {
        Err(EditorError::Validation(errors)) => assert_eq!(errors[0].field, "title"),
        other => panic!("Expected validation error, got {:?}", other),
    }

    let after = service.store().get_document::<Page>("home").await.unwrap();
    assert_eq!(after, before);
    assert!(editor.recent_edits().await.is_empty());
}

#[tokio::test]
async fn test_section_editing() {
    let (editor, _service) = setup_editor().await;
    let mut session = editor.open_page("home").await.unwrap();
    let original = section_ids(session.page());
    assert!(original.len() >= 2);

    // swap the first two
    assert!(session.move_section(&original[1], Direction::Up));
    let moved = section_ids(session.page());
    assert_eq!(moved[0], original[1]);
    assert_eq!(moved[1], original[0]);

    assert!(session.update_section(
        &original[0],
        SectionPatch {
            body: Some(BilingualText::new("Nouveau texte", "نص جديد")),
            image: Some(Some("/uploads/hero.png".into())),
            ..Default::default()
        }
    ));
    let section = session.page().section(&original[0]).unwrap();
    assert_eq!(section.body.fr, "Nouveau texte");
    assert_eq!(section.image.as_deref(), Some("/uploads/hero.png"));

    assert!(session.remove_section(&original[0]));
    assert!(!session.remove_section(&original[0]));
    assert!(!session.update_section("missing", SectionPatch::default()));
}

#[tokio::test]
async fn test_testimonial_rating_out_of_range() {
    let (editor, service) = setup_editor().await;
    let mut testimonial = seed::default_testimonials().remove(0);
    testimonial.rating = 6;

    let result = editor.save(testimonial.clone()).await;
    assert!(matches!(result, Err(EditorError::Validation(_))));

    // the stored one keeps its old rating
    let stored = service
        .store()
        .get_document::<Testimonial>(&testimonial.id)
        .await
        .unwrap();
    assert_eq!(stored.rating, 5);
}

// a document saved without an id gets a fresh one
#[tokio::test]
async fn test_blank_id_gets_uuid() {
    let (editor, service) = setup_editor().await;
    let mut testimonial = seed::default_testimonials().remove(0);
    testimonial.id = String::new();

    let saved = editor.save(testimonial).await.unwrap();

    assert!(uuid::Uuid::parse_str(&saved.id).is_ok());
    assert!(service
        .store()
        .get_document::<Testimonial>(&saved.id)
        .await
        .is_some());
}

// two sessions opened at the same version: the second checked save loses
#[tokio::test]
async fn test_checked_save_detects_conflict() {
    let (editor, _service) = setup_editor().await;
    let mut first = editor.open_page("about").await.unwrap();
    let mut second = editor.open_page("about").await.unwrap();

    first.set_title(Locale::Fr, "Qui sommes-nous");
    assert_eq!(editor.save_page_checked(&mut first).await.unwrap(), 1);

    second.set_title(Locale::Fr, "À propos de nous");
    match editor.save_page_checked(&mut second).await {
        Err(EditorError::Conflict { expected, current }) => {
            assert_eq!(expected, 0);
            assert_eq!(current, 1);
        }
        other => panic!("Expected conflict, got {:?}", other),
    }

    // after reopening, the save goes through
    let mut reopened = editor.open_page("about").await.unwrap();
    reopened.set_title(Locale::Fr, "À propos de nous");
    assert_eq!(editor.save_page_checked(&mut reopened).await.unwrap(), 2);
}

// the store announces the page first, then the editor signals its own save
#[tokio::test]
async fn test_save_emits_signals() {
    let (editor, service) = setup_editor().await;
    let mut signals = service.bus().subscribe_signals();

    let mut session = editor.open_page("home").await.unwrap();
    editor.save_page(&mut session).await.unwrap();

    let first = signals.try_recv().unwrap();
    let second = signals.try_recv().unwrap();
    assert_eq!(first.key, "page_home");
    assert_eq!(second.key, "editor_home");

    let payload: Page = serde_json::from_str(&second.new_value).unwrap();
    assert_eq!(&payload, session.page());
}

#[tokio::test]
async fn test_open_unknown_page() {
    let (editor, _service) = setup_editor().await;

    match editor.open_page("nowhere").await {
        Err(err @ EditorError::Loading { .. }) => {
            assert_eq!(err.user_message(Locale::Fr), "Erreur lors du chargement");
            assert_eq!(err.user_message(Locale::Ar), "خطأ أثناء التحميل");
        }
        other => panic!("Expected loading error, got {:?}", other),
    }
}

// a brand-new page starts at version 0 and lands in the store
#[tokio::test]
async fn test_new_page() {
    let (editor, service) = setup_editor().await;
    let mut session = editor.new_page("donate", BilingualText::new("Faire un don", "تبرع"));

    editor.save_page(&mut session).await.unwrap();

    assert_eq!(service.store().get_all_documents::<Page>().await.len(), 5);
    assert_eq!(
        service.store().version_of(DocumentKind::Pages, "donate").await,
        1
    );
}

#[tokio::test]
async fn test_delete_records_edit() {
    let (editor, service) = setup_editor().await;

    editor.delete::<Testimonial>("testimonial-2").await.unwrap();

    assert!(service
        .store()
        .get_document::<Testimonial>("testimonial-2")
        .await
        .is_none());
    let edits = editor.recent_edits().await;
    assert_eq!(edits[0].kind, DocumentKind::Testimonials);
    assert_eq!(edits[0].action, EditAction::Deleted);
}

// the log keeps only the latest entries, newest first
#[tokio::test]
async fn test_recent_edits_are_capped() {
    let (editor, _service) = setup_editor().await;
    let testimonial = seed::default_testimonials().remove(0);

    for _ in 0..25 {
        editor.save(testimonial.clone()).await.unwrap();
    }
    editor.delete::<Testimonial>("testimonial-3").await.unwrap();

    let edits = editor.recent_edits().await;
    assert_eq!(edits.len(), crate::editor::RECENT_EDITS_LIMIT);
    assert_eq!(edits[0].id, "testimonial-3");
}

// the error text names every offending field
#[tokio::test]
async fn test_editor_error_display() {
    let (editor, _service) = setup_editor().await;
    let mut session = editor.open_page("home").await.unwrap();
    session.set_title(Locale::Ar, "");

    let err = editor.save_page(&mut session).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation failed: title: missing translation (ar)"
    );

    let conflict = EditorError::Conflict {
        expected: 1,
        current: 3,
    };
    assert_eq!(
        conflict.to_string(),
        "content changed since it was loaded (version 1 is now 3)"
    );
}
