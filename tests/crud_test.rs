//! End-to-end persistence orchestration against in-memory SQLite.

mod common;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use restbase::domain::UpdateUser;
use restbase::errors::AppError;
use restbase::infra::repositories::entities::user;
use restbase::infra::repositories::{
    Conditional, CrudRepository, Operation, OrderBy, ReadRepository,
};
use restbase::services::crud::{ResourceCreator, ResourceDeleter};
use restbase::services::UserService;
use sea_orm::ActiveValue;
use validator::{ValidationError, ValidationErrors};

use common::{create_payload, seed_user, setup};

#[tokio::test]
async fn create_assigns_distinct_keys() {
    let store = setup().await;
    let service = UserService::new(store);

    let first = seed_user(&service, "Ada", "ada@example.com").await;
    let second = seed_user(&service, "Grace", "grace@example.com").await;

    assert_ne!(first.id, second.id);
    assert_eq!(service.get(first.id).await.unwrap().email, "ada@example.com");
}

#[tokio::test]
async fn create_conflict_writes_nothing() {
    let store = setup().await;
    let service = UserService::new(store);

    seed_user(&service, "Ada", "ada@example.com").await;
    let result = service
        .create(&create_payload("Impostor", "ada@example.com"))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(service.count().await.unwrap(), 1);
}

#[tokio::test]
async fn batch_create_is_all_or_nothing() {
    let store = setup().await;

    let validator = Arc::new(|draft: &user::ActiveModel| {
        if matches!(&draft.name, ActiveValue::Set(name) if name == "bad") {
            let mut errors = ValidationErrors::new();
            errors.add("name", ValidationError::new("forbidden"));
            Err(errors)
        } else {
            Ok(())
        }
    });
    let creator = ResourceCreator::<user::Entity>::with_validator(store.clone(), validator);

    let mixed = vec![
        create_payload("Ada", "ada@example.com"),
        create_payload("bad", "bad@example.com"),
    ];
    let result = creator.create_all(&mixed).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(
        store.repository::<user::Entity>().count().await.unwrap(),
        0
    );

    let valid = vec![
        create_payload("Ada", "ada@example.com"),
        create_payload("Grace", "grace@example.com"),
    ];
    let created = creator.create_all(&valid).await.unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].name, "Ada");
    assert_eq!(created[1].name, "Grace");
}

#[tokio::test]
async fn deleter_accepts_entities_directly() {
    let store = setup().await;
    let service = UserService::new(store.clone());

    let ada = seed_user(&service, "Ada", "ada@example.com").await;
    let grace = seed_user(&service, "Grace", "grace@example.com").await;

    let deleter = ResourceDeleter::<user::Entity>::new(store);

    let removed = deleter.delete_entity(ada.clone()).await.unwrap();
    assert_eq!(removed.id, ada.id);

    let echoed = deleter.delete_all(vec![grace.clone()]).await.unwrap();
    assert_eq!(echoed.len(), 1);
    assert_eq!(echoed[0].id, grace.id);

    assert!(deleter.delete_all(vec![]).await.unwrap().is_empty());
    assert_eq!(service.count().await.unwrap(), 0);
}

#[tokio::test]
async fn get_missing_is_not_found() {
    let store = setup().await;
    let service = UserService::new(store);

    let result = service.get(999).await;
    assert!(matches!(
        result,
        Err(AppError::NotFound {
            resource: "User",
            ..
        })
    ));
}

#[tokio::test]
async fn get_many_skips_missing_keys() {
    let store = setup().await;
    let service = UserService::new(store);

    let ada = seed_user(&service, "Ada", "ada@example.com").await;
    let ids = HashSet::from([ada.id, ada.id + 100]);

    let found = service.get_many(&ids).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[&ada.id].name, "Ada");
}

#[tokio::test]
async fn existence_is_vacuously_true_for_empty_sets() {
    let store = setup().await;
    let service = UserService::new(store);

    assert!(service.exists_all(&HashSet::new()).await.unwrap());

    let ada = seed_user(&service, "Ada", "ada@example.com").await;
    assert!(service.exists_all(&HashSet::from([ada.id])).await.unwrap());
    assert!(!service
        .exists_all(&HashSet::from([ada.id, ada.id + 1]))
        .await
        .unwrap());
    assert!(service.exists(ada.id).await.unwrap());
    assert!(!service.exists(ada.id + 1).await.unwrap());
}

#[tokio::test]
async fn pagination_clamps_out_of_range_requests() {
    let store = setup().await;
    let service = UserService::new(store);

    for i in 0..5 {
        seed_user(&service, &format!("User{i}"), &format!("u{i}@example.com")).await;
    }

    // Page numbers below 1 behave as page 1
    let first = service.list_page(2, 0).await.unwrap();
    let also_first = service.list_page(2, 1).await.unwrap();
    assert_eq!(
        first.iter().map(|u| u.id).collect::<Vec<_>>(),
        also_first.iter().map(|u| u.id).collect::<Vec<_>>()
    );
    assert_eq!(first.len(), 2);

    // Negative sizes behave as zero
    assert!(service.list_page(-5, 1).await.unwrap().is_empty());

    // Pages past the end are empty, not an error
    assert!(service.list_page(2, 99).await.unwrap().is_empty());

    assert_eq!(service.list().await.unwrap().len(), 5);
}

#[tokio::test]
async fn update_merges_only_named_fields() {
    let store = setup().await;
    let service = UserService::new(store);

    let ada = seed_user(&service, "Ada", "ada@example.com").await;

    let updated = service
        .update(
            ada.id,
            &UpdateUser {
                name: Some("B".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, ada.id);
    assert_eq!(updated.name, "B");
    assert_eq!(updated.email, "ada@example.com");
    assert_eq!(updated.password_hash, ada.password_hash);
    assert_eq!(updated.created_at, ada.created_at);
}

#[tokio::test]
async fn update_missing_is_not_found() {
    let store = setup().await;
    let service = UserService::new(store);

    let result = service
        .update(
            42,
            &UpdateUser {
                name: Some("Nobody".to_string()),
                ..UpdateUser::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn update_rejects_invalid_merged_row() {
    let store = setup().await;
    let service = UserService::new(store);

    let ada = seed_user(&service, "Ada", "ada@example.com").await;

    let result = service
        .update(
            ada.id,
            &UpdateUser {
                // Deserialized payloads can carry an empty string
                name: Some(String::new()),
                ..UpdateUser::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(service.get(ada.id).await.unwrap().name, "Ada");
}

#[tokio::test]
async fn update_to_taken_email_is_a_conflict() {
    let store = setup().await;
    let service = UserService::new(store);

    let ada = seed_user(&service, "Ada", "ada@example.com").await;
    let grace = seed_user(&service, "Grace", "grace@example.com").await;

    let result = service
        .update(
            grace.id,
            &UpdateUser {
                email: Some("ada@example.com".to_string()),
                ..UpdateUser::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(
        service.get(grace.id).await.unwrap().email,
        "grace@example.com"
    );

    // Re-asserting one's own email is not a conflict
    let kept = service
        .update(
            ada.id,
            &UpdateUser {
                email: Some("ada@example.com".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(kept.email, "ada@example.com");
}

#[tokio::test]
async fn batch_update_rejects_taken_email() {
    let store = setup().await;
    let service = UserService::new(store);

    seed_user(&service, "Ada", "ada@example.com").await;
    let grace = seed_user(&service, "Grace", "grace@example.com").await;

    let patches = HashMap::from([(
        grace.id,
        UpdateUser {
            name: Some("Grace2".to_string()),
            email: Some("ada@example.com".to_string()),
            ..UpdateUser::default()
        },
    )]);

    let result = service.update_many(patches).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let unchanged = service.get(grace.id).await.unwrap();
    assert_eq!(unchanged.name, "Grace");
    assert_eq!(unchanged.email, "grace@example.com");
}

#[tokio::test]
async fn batch_update_rolls_back_on_missing_key() {
    let store = setup().await;
    let service = UserService::new(store);

    let ada = seed_user(&service, "Ada", "ada@example.com").await;
    let grace = seed_user(&service, "Grace", "grace@example.com").await;

    let rename = |name: &str| UpdateUser {
        name: Some(name.to_string()),
        ..UpdateUser::default()
    };

    let patches = HashMap::from([
        (ada.id, rename("Ada2")),
        (grace.id, rename("Grace2")),
        (-1, rename("Ghost")),
    ]);

    let result = service.update_many(patches).await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));

    // Nothing from the batch stuck
    assert_eq!(service.get(ada.id).await.unwrap().name, "Ada");
    assert_eq!(service.get(grace.id).await.unwrap().name, "Grace");
}

#[tokio::test]
async fn batch_update_applies_all_patches() {
    let store = setup().await;
    let service = UserService::new(store);

    let ada = seed_user(&service, "Ada", "ada@example.com").await;
    let grace = seed_user(&service, "Grace", "grace@example.com").await;

    let patches = HashMap::from([
        (
            ada.id,
            UpdateUser {
                name: Some("Ada2".to_string()),
                ..UpdateUser::default()
            },
        ),
        (
            grace.id,
            UpdateUser {
                email: Some("grace2@example.com".to_string()),
                ..UpdateUser::default()
            },
        ),
    ]);

    let updated = service.update_many(patches).await.unwrap();
    assert_eq!(updated.len(), 2);
    assert_eq!(updated[&ada.id].name, "Ada2");
    assert_eq!(updated[&grace.id].email, "grace2@example.com");
}

#[tokio::test]
async fn delete_returns_removed_row_and_missing_is_not_found() {
    let store = setup().await;
    let service = UserService::new(store);

    let ada = seed_user(&service, "Ada", "ada@example.com").await;

    let removed = service.delete(ada.id).await.unwrap();
    assert_eq!(removed.email, "ada@example.com");
    assert_eq!(service.count().await.unwrap(), 0);

    let result = service.delete(ada.id).await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn batch_delete_skips_missing_keys() {
    let store = setup().await;
    let service = UserService::new(store);

    let ada = seed_user(&service, "Ada", "ada@example.com").await;
    let grace = seed_user(&service, "Grace", "grace@example.com").await;

    let removed = service
        .delete_many(vec![ada.id, -7, grace.id])
        .await
        .unwrap();

    assert_eq!(removed.len(), 2);
    assert!(removed.contains_key(&ada.id));
    assert!(removed.contains_key(&grace.id));
    assert_eq!(service.count().await.unwrap(), 0);

    assert!(service.delete_many(vec![]).await.unwrap().is_empty());
}

#[tokio::test]
async fn repository_delete_reports_absence_in_the_return_value() {
    let store = setup().await;
    let service = UserService::new(store.clone());

    let ada = seed_user(&service, "Ada", "ada@example.com").await;
    let repo = store.repository::<user::Entity>();

    let removed = repo.delete_by_id(ada.id).await.unwrap();
    assert_eq!(removed.map(|u| u.id), Some(ada.id));
    assert!(repo.delete_by_id(ada.id).await.unwrap().is_none());
}

#[tokio::test]
async fn query_builder_filters_and_orders() {
    let store = setup().await;
    let service = UserService::new(store.clone());

    seed_user(&service, "Ada", "ada@example.com").await;
    seed_user(&service, "Grace", "grace@example.com").await;
    seed_user(&service, "Alan", "alan@example.com").await;

    let matched = store
        .repository::<user::Entity>()
        .query()
        .filter(Conditional::and(
            Conditional::op(Operation::like("name", "A%")),
            Conditional::op(Operation::ne("email", "alan@example.com")),
        ))
        .order_by(OrderBy::asc("name"))
        .all()
        .await
        .unwrap();

    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Ada");

    let ordered = store
        .repository::<user::Entity>()
        .query()
        .order_by(OrderBy::desc("name"))
        .all()
        .await
        .unwrap();
    let names: Vec<_> = ordered.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Grace", "Alan", "Ada"]);
}

#[tokio::test]
async fn query_builder_rejects_unknown_attributes() {
    let store = setup().await;

    let result = store
        .repository::<user::Entity>()
        .query()
        .filter(Conditional::op(Operation::eq("no_such_column", 1)))
        .all()
        .await;

    assert!(matches!(result, Err(AppError::QueryCompile(_))));
}
