//! User-with-books workflow tests over the in-memory backend.

use std::sync::Arc;

use common::AppError;
use domain::{BookRequest, UserBookRequest, UserRequest};
use library_service_lib::infra::{MemoryUnitOfWork, UnitOfWork};
use library_service_lib::repository::Store;
use library_service_lib::service::{UserBookFacade, UserBookManager};

fn setup() -> (Arc<MemoryUnitOfWork>, UserBookManager<MemoryUnitOfWork>) {
    let uow = Arc::new(MemoryUnitOfWork::new());
    let facade = UserBookManager::new(uow.clone());
    (uow, facade)
}

fn ann() -> UserRequest {
    UserRequest {
        full_name: "Ann".to_string(),
        age: 30,
        ..Default::default()
    }
}

fn book(title: &str, author: &str, page_count: u32) -> BookRequest {
    BookRequest {
        title: title.to_string(),
        author: author.to_string(),
        page_count,
        ..Default::default()
    }
}

fn ann_with_two_books() -> UserBookRequest {
    UserBookRequest::new(ann(), vec![book("A", "X", 100), book("B", "Y", 200)])
}

#[tokio::test]
async fn test_create_then_get_user_with_books() {
    let (_, facade) = setup();

    let created = facade
        .create_user_with_books(ann_with_two_books())
        .await
        .unwrap();
    assert_eq!(created.user_id, 1);
    assert_eq!(created.books_id_list, vec![1, 2]);

    let fetched = facade.get_user_with_books(created.user_id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_with_empty_list_creates_only_user() {
    let (uow, facade) = setup();

    let created = facade
        .create_user_with_books(UserBookRequest::new(ann(), vec![]))
        .await
        .unwrap();

    assert!(created.books_id_list.is_empty());
    assert_eq!(uow.person_store().len().unwrap(), 1);
    assert!(uow.book_store().is_empty().unwrap());
}

#[tokio::test]
async fn test_create_skips_null_book_entries() {
    let (_, facade) = setup();
    let request = UserBookRequest {
        user_request: Some(ann()),
        book_requests: Some(vec![None, Some(book("A", "X", 100)), None]),
    };

    let created = facade.create_user_with_books(request).await.unwrap();
    assert_eq!(created.books_id_list, vec![1]);
}

#[tokio::test]
async fn test_create_with_null_book_list_rolls_back_user() {
    let (uow, facade) = setup();
    let request = UserBookRequest {
        user_request: Some(ann()),
        book_requests: None,
    };

    let err = facade.create_user_with_books(request).await.unwrap_err();

    assert!(matches!(err, AppError::InvalidArgument(_)));
    assert!(uow.person_store().is_empty().unwrap());
    assert!(uow.book_store().is_empty().unwrap());
}

#[tokio::test]
async fn test_create_without_user_is_invalid() {
    let (_, facade) = setup();
    let request = UserBookRequest {
        user_request: None,
        book_requests: Some(vec![]),
    };

    let err = facade.create_user_with_books(request).await.unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn test_create_cannot_take_over_existing_book() {
    let (uow, facade) = setup();
    let ann_books = facade
        .create_user_with_books(UserBookRequest::new(ann(), vec![book("A", "X", 100)]))
        .await
        .unwrap();

    let mut stolen = book("stolen", "Z", 1);
    stolen.id = Some(ann_books.books_id_list[0]);
    let err = facade
        .create_user_with_books(UserBookRequest::new(
            UserRequest {
                full_name: "Bob".to_string(),
                ..Default::default()
            },
            vec![stolen],
        ))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    let kept = uow.book_store().find_by_id(ann_books.books_id_list[0]).unwrap();
    assert_eq!(kept.person_id, ann_books.user_id);
    assert_eq!(kept.title, "A");
    assert_eq!(uow.person_store().len().unwrap(), 1);
    assert_eq!(
        facade.get_user_with_books(ann_books.user_id).await.unwrap(),
        ann_books
    );
}

#[tokio::test]
async fn test_create_cannot_overwrite_existing_user() {
    let (uow, facade) = setup();
    let created = facade
        .create_user_with_books(UserBookRequest::new(ann(), vec![]))
        .await
        .unwrap();

    let err = facade
        .create_user_with_books(UserBookRequest::new(
            UserRequest {
                id: Some(created.user_id),
                full_name: "Mallory".to_string(),
                ..Default::default()
            },
            vec![],
        ))
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    let person = uow.person_store().find_by_id(created.user_id).unwrap();
    assert_eq!(person.full_name, "Ann");
}

#[tokio::test]
async fn test_create_with_huge_supplied_id_is_rejected() {
    let (uow, facade) = setup();

    let err = facade
        .create_user_with_books(UserBookRequest::new(
            UserRequest {
                id: Some(i64::MAX),
                full_name: "Max".to_string(),
                ..Default::default()
            },
            vec![],
        ))
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());

    let created = facade
        .create_user_with_books(UserBookRequest::new(ann(), vec![]))
        .await
        .unwrap();
    assert_eq!(created.user_id, 1);
    assert_eq!(uow.person_store().len().unwrap(), 1);
}

#[tokio::test]
async fn test_update_requires_user_and_book_list() {
    let (uow, facade) = setup();
    let created = facade
        .create_user_with_books(ann_with_two_books())
        .await
        .unwrap();

    let mut user = ann();
    user.id = Some(created.user_id);
    user.full_name = "Changed".to_string();
    let err = facade
        .update_user_with_books(UserBookRequest {
            user_request: Some(user),
            book_requests: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "List of books can't be null");

    let err = facade
        .update_user_with_books(UserBookRequest {
            user_request: None,
            book_requests: Some(vec![]),
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "User request can't be null");

    let person = uow.person_store().find_by_id(created.user_id).unwrap();
    assert_eq!(person.full_name, "Ann");
}

#[tokio::test]
async fn test_invalid_book_rolls_back_whole_create() {
    let (uow, facade) = setup();
    let request = UserBookRequest::new(ann(), vec![book("A", "X", 100), book("", "Y", 1)]);

    let err = facade.create_user_with_books(request).await.unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(uow.person_store().is_empty().unwrap());
    assert!(uow.book_store().is_empty().unwrap());
}

#[tokio::test]
async fn test_owner_is_stamped_from_created_user() {
    let (uow, facade) = setup();
    let first = facade
        .create_user_with_books(UserBookRequest::new(ann(), vec![]))
        .await
        .unwrap();

    let created = facade
        .create_user_with_books(UserBookRequest::new(
            UserRequest {
                full_name: "Bob".to_string(),
                ..Default::default()
            },
            vec![book("A", "X", 100)],
        ))
        .await
        .unwrap();

    let stored = uow.book_store().find_by_id(created.books_id_list[0]).unwrap();
    assert_eq!(stored.person_id, created.user_id);
    assert_ne!(stored.person_id, first.user_id);
    assert!(facade
        .get_user_with_books(first.user_id)
        .await
        .unwrap()
        .books_id_list
        .is_empty());
}

#[tokio::test]
async fn test_update_user_with_books() {
    let (uow, facade) = setup();
    let created = facade
        .create_user_with_books(ann_with_two_books())
        .await
        .unwrap();

    let mut user = ann();
    user.id = Some(created.user_id);
    user.title = "librarian".to_string();
    let mut renamed = book("A2", "X", 150);
    renamed.id = Some(created.books_id_list[0]);

    let updated = facade
        .update_user_with_books(UserBookRequest::new(user, vec![renamed]))
        .await
        .unwrap();

    assert_eq!(updated.user_id, created.user_id);
    assert_eq!(updated.books_id_list, vec![created.books_id_list[0]]);

    let person = uow.person_store().find_by_id(created.user_id).unwrap();
    assert_eq!(person.title, "librarian");
    assert_eq!(person.status, "ACTIVE");
    let book = uow.book_store().find_by_id(created.books_id_list[0]).unwrap();
    assert_eq!((book.title.as_str(), book.page_count), ("A2", 150));
    assert_eq!(book.person_id, created.user_id);
}

#[tokio::test]
async fn test_update_missing_user_leaves_stores_unchanged() {
    let (uow, facade) = setup();
    facade
        .create_user_with_books(ann_with_two_books())
        .await
        .unwrap();
    let people_before = uow.person_store().find_all().unwrap();

    let mut ghost = ann();
    ghost.id = Some(42);
    let err = facade
        .update_user_with_books(UserBookRequest::new(ghost, vec![]))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(uow.person_store().find_all().unwrap(), people_before);
    assert_eq!(uow.book_store().len().unwrap(), 2);
}

#[tokio::test]
async fn test_update_with_missing_book_rolls_back_user_update() {
    let (uow, facade) = setup();
    let created = facade
        .create_user_with_books(ann_with_two_books())
        .await
        .unwrap();

    let mut user = ann();
    user.id = Some(created.user_id);
    user.full_name = "Changed".to_string();
    let mut existing = book("A2", "X", 1);
    existing.id = Some(created.books_id_list[0]);
    let mut missing = book("C", "Z", 1);
    missing.id = Some(99);

    let err = facade
        .update_user_with_books(UserBookRequest::new(user, vec![existing, missing]))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    let person = uow.person_store().find_by_id(created.user_id).unwrap();
    assert_eq!(person.full_name, "Ann");
    let book = uow.book_store().find_by_id(created.books_id_list[0]).unwrap();
    assert_eq!(book.title, "A");
}

#[tokio::test]
async fn test_update_cannot_take_over_foreign_book() {
    let (uow, facade) = setup();
    let ann_books = facade
        .create_user_with_books(ann_with_two_books())
        .await
        .unwrap();
    let bob = facade
        .create_user_with_books(UserBookRequest::new(
            UserRequest {
                full_name: "Bob".to_string(),
                ..Default::default()
            },
            vec![],
        ))
        .await
        .unwrap();

    let mut user = ann();
    user.id = Some(bob.user_id);
    user.full_name = "Bob".to_string();
    let mut foreign = book("Mine now", "X", 1);
    foreign.id = Some(ann_books.books_id_list[0]);

    let err = facade
        .update_user_with_books(UserBookRequest::new(user, vec![foreign]))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    let stored = uow.book_store().find_by_id(ann_books.books_id_list[0]).unwrap();
    assert_eq!(stored.person_id, ann_books.user_id);
}

#[tokio::test]
async fn test_delete_user_with_books_cascades() {
    let (uow, facade) = setup();
    let created = facade
        .create_user_with_books(ann_with_two_books())
        .await
        .unwrap();

    facade.delete_user_with_books(created.user_id).await.unwrap();

    assert!(facade
        .get_user_with_books(created.user_id)
        .await
        .unwrap_err()
        .is_not_found());
    for id in created.books_id_list {
        assert!(uow.book_store().find_by_id(id).unwrap_err().is_not_found());
    }
}

#[tokio::test]
async fn test_delete_missing_user_is_not_found() {
    let (_, facade) = setup();
    let err = facade.delete_user_with_books(7).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_get_missing_user_is_not_found() {
    let (_, facade) = setup();
    let err = facade.get_user_with_books(1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_facade_works_through_trait_object() {
    let uow: Arc<dyn UnitOfWork> = Arc::new(MemoryUnitOfWork::new());
    let facade: Arc<dyn UserBookFacade> = Arc::new(UserBookManager::new(uow));

    let responses = library_service_lib::run_demo(facade.as_ref()).await.unwrap();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0], responses[1]);
    assert_eq!(responses[2], responses[0]);
}

#[tokio::test]
async fn test_concurrent_workflows_get_distinct_ids() {
    let uow = Arc::new(MemoryUnitOfWork::new());
    let facade = Arc::new(UserBookManager::new(uow.clone()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let facade = facade.clone();
            tokio::spawn(async move {
                facade
                    .create_user_with_books(ann_with_two_books())
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut book_ids = Vec::new();
    for handle in handles {
        book_ids.extend(handle.await.unwrap().books_id_list);
    }
    book_ids.sort_unstable();
    book_ids.dedup();

    assert_eq!(book_ids.len(), 16);
    assert_eq!(uow.person_store().len().unwrap(), 8);
}
