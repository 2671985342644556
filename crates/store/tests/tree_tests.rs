//! Integration tests for tree assembly and model management.

mod common;

use checkwright_core::NodeKind;
use checkwright_store::models::ModelRow;
use checkwright_store::{ModelRepo, NodeRepo, StoreError, build_tree};
use common::{model_code, open_store, register_model};
use time::OffsetDateTime;

#[tokio::test]
async fn test_build_tree_nests_in_order() {
    let (store, _dir) = open_store().await;
    let model = register_model(&store, "hp-200", &["design"]).await;

    let press = store.create_press(&model, "Line 1").await.unwrap();
    let frame = store
        .create_child(press.node_id, NodeKind::Assembly, "Frame")
        .await
        .unwrap();
    let drive = store
        .create_child(press.node_id, NodeKind::Assembly, "Drive")
        .await
        .unwrap();
    store
        .create_child(frame.node_id, NodeKind::Part, "Bracket")
        .await
        .unwrap();
    store
        .create_child(frame.node_id, NodeKind::Part, "Plate")
        .await
        .unwrap();

    let tree = build_tree(&store, &model).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].name, "Line 1");
    assert_eq!(tree[0].assemblies.len(), 2);
    assert_eq!(tree[0].assemblies[0].name, "Frame");
    assert_eq!(tree[0].assemblies[1].name, "Drive");
    assert_eq!(tree[0].assemblies[1].id, drive.node_id);

    let part_names: Vec<&str> = tree[0].assemblies[0]
        .parts
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(part_names, vec!["Bracket", "Plate"]);
    assert!(tree[0].assemblies[1].parts.is_empty());
}

#[tokio::test]
async fn test_build_tree_reflects_moves() {
    let (store, _dir) = open_store().await;
    let model = register_model(&store, "hp-200", &["design"]).await;
    let press = store.create_press(&model, "Line 1").await.unwrap();
    for name in ["A", "B", "C"] {
        store
            .create_child(press.node_id, NodeKind::Assembly, name)
            .await
            .unwrap();
    }

    store.move_child(press.node_id, &model, 0, 2).await.unwrap();

    let tree = build_tree(&store, &model).await.unwrap();
    let names: Vec<&str> = tree[0].assemblies.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C", "A"]);
}

#[tokio::test]
async fn test_build_tree_for_unknown_model_is_not_found() {
    let (store, _dir) = open_store().await;
    let err = build_tree(&store, &model_code("ghost")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_build_tree_only_sees_its_model() {
    let (store, _dir) = open_store().await;
    let t1 = register_model(&store, "t1", &["design"]).await;
    let t2 = register_model(&store, "t2", &["design"]).await;
    store.create_press(&t1, "T1 Line").await.unwrap();
    store.create_press(&t2, "T2 Line").await.unwrap();

    let tree = build_tree(&store, &t1).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].name, "T1 Line");
}

#[tokio::test]
async fn test_duplicate_model_is_a_conflict() {
    let (store, _dir) = open_store().await;
    register_model(&store, "hp-200", &["design"]).await;

    let now = OffsetDateTime::now_utc();
    let dup = ModelRow {
        model_code: "hp-200".to_string(),
        display_name: "Duplicate".to_string(),
        sections: "[\"design\"]".to_string(),
        created_at: now,
        updated_at: now,
    };
    let err = store.create_model(&dup).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_model_validation() {
    let (store, _dir) = open_store().await;
    let now = OffsetDateTime::now_utc();

    let empty_sections = ModelRow {
        model_code: "hp-200".to_string(),
        display_name: "HP 200".to_string(),
        sections: "[]".to_string(),
        created_at: now,
        updated_at: now,
    };
    let err = store.create_model(&empty_sections).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)), "got {err:?}");

    let bad_code = ModelRow {
        model_code: "HP 200".to_string(),
        display_name: "HP 200".to_string(),
        sections: "[\"design\"]".to_string(),
        created_at: now,
        updated_at: now,
    };
    let err = store.create_model(&bad_code).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)), "got {err:?}");

    let dup_sections = ModelRow {
        model_code: "hp-200".to_string(),
        display_name: "HP 200".to_string(),
        sections: "[\"design\", \"design\"]".to_string(),
        created_at: now,
        updated_at: now,
    };
    let err = store.create_model(&dup_sections).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_list_models_sorted_by_code() {
    let (store, _dir) = open_store().await;
    register_model(&store, "zx-9", &["design"]).await;
    register_model(&store, "ax-1", &["design"]).await;

    let models = store.list_models().await.unwrap();
    let codes: Vec<&str> = models.iter().map(|m| m.model_code.as_str()).collect();
    assert_eq!(codes, vec!["ax-1", "zx-9"]);

    let fetched = store.get_model(&model_code("ax-1")).await.unwrap().unwrap();
    assert_eq!(fetched.section_list().unwrap(), vec!["design"]);
}
