//! Photo and photo category maintenance through the admin panel.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use buffet_simone_integration_tests::{
    Admin, admin_with, logged_in_admin, multipart_body, storefront_with,
};
use buffet_simone_store::{InMemoryDocumentStore, MemoryLocalStore};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

async fn upload(panel: &mut Admin, name: &str, category: &str) -> serde_json::Value {
    let body = multipart_body(
        &[("name", name), ("description", "Mesa de doces"), ("category", category)],
        Some(("foto.png", "image/png", PNG)),
    );
    let response = panel.client.post_multipart("/admin/photos", body).await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.body
}

#[tokio::test]
async fn test_photo_category_lifecycle() {
    let mut panel = logged_in_admin().await;

    let response = panel
        .client
        .post(
            "/admin/photo-categories",
            json!({ "label": "Doces", "icon_label": "Cookie" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "Categoria criada com sucesso!");
    assert_eq!(response.body["categories"][0]["label"], "Doces");
    assert_eq!(response.body["categories"][0]["iconLabel"], "Cookie");
    // The new category is preselected for the next upload.
    assert_eq!(response.body["selected_category"], "Doces");

    let duplicate = panel
        .client
        .post(
            "/admin/photo-categories",
            json!({ "label": "doces", "icon_label": "Cake" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.body["error"], "A categoria \"doces\" já existe!");

    let no_icon = panel
        .client
        .post("/admin/photo-categories", json!({ "label": "Festas" }))
        .await;
    assert_eq!(no_icon.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(no_icon.body["error"], "Selecione um ícone.");

    let declined = panel.client.delete("/admin/photo-categories/Doces").await;
    assert_eq!(declined.status, StatusCode::OK);
    assert_eq!(declined.body["outcome"], "cancelled");
    assert_eq!(declined.body["categories"].as_array().unwrap().len(), 1);

    let deleted = panel
        .client
        .delete("/admin/photo-categories/Doces?confirm=true")
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["outcome"], "deleted");
    assert_eq!(deleted.body["categories"], json!([]));
    assert!(deleted.body["selected_category"].is_null());

    let unknown = panel
        .client
        .delete("/admin/photo-categories/Doces?confirm=true")
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_and_delete_photo() {
    let mut panel = logged_in_admin().await;
    panel
        .client
        .post(
            "/admin/photo-categories",
            json!({ "label": "Doces", "icon_label": "Cookie" }),
        )
        .await;

    let body = upload(&mut panel, "Brigadeiros", "Doces").await;
    assert_eq!(body["message"], "Foto adicionada com sucesso!");
    let photo = &body["photos"][0];
    assert_eq!(photo["name"], "Brigadeiros");
    assert_eq!(photo["description"], "Mesa de doces");
    assert_eq!(photo["category"], "Doces");
    assert!(
        photo["image"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
    let id = photo["id"].as_str().unwrap().to_owned();

    let declined = panel.client.delete(&format!("/admin/photos/{id}")).await;
    assert_eq!(declined.status, StatusCode::OK);
    assert_eq!(declined.body["outcome"], "cancelled");
    assert_eq!(declined.body["photos"].as_array().unwrap().len(), 1);

    let deleted = panel
        .client
        .delete(&format!("/admin/photos/{id}?confirm=true"))
        .await;
    assert_eq!(deleted.body["outcome"], "deleted");
    assert_eq!(deleted.body["message"], "Foto excluída com sucesso!");
    assert_eq!(deleted.body["photos"], json!([]));

    let unknown = panel
        .client
        .delete(&format!("/admin/photos/{id}?confirm=true"))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_rejects_incomplete_or_non_image() {
    let mut panel = logged_in_admin().await;

    let no_file = multipart_body(&[("name", "Salão"), ("category", "Festas")], None);
    let response = panel.client.post_multipart("/admin/photos", no_file).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["error"],
        "Preencha todos os campos e escolha uma imagem!"
    );

    let text_file = multipart_body(
        &[("name", "Salão"), ("category", "Festas")],
        Some(("notas.txt", "text/plain", b"ola")),
    );
    let response = panel.client.post_multipart("/admin/photos", text_file).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let view = panel.client.get("/admin/photos").await;
    assert_eq!(view.body["photos"], json!([]));
}

#[tokio::test]
async fn test_uploads_require_login() {
    let mut panel = logged_in_admin().await;
    let mut stranger = panel.client.fresh();

    let body = multipart_body(
        &[("name", "Salão"), ("category", "Festas")],
        Some(("foto.png", "image/png", PNG)),
    );
    let response = stranger.post_multipart("/admin/photos", body).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    assert_eq!(panel.client.get("/admin/photos").await.body["photos"], json!([]));
}

#[tokio::test]
async fn test_storefront_gallery_shows_uploads() {
    let local = Arc::new(MemoryLocalStore::new());
    let mut panel = admin_with(Arc::new(InMemoryDocumentStore::new()), Arc::clone(&local)).await;
    let mut site = storefront_with(Arc::new(InMemoryDocumentStore::new()), local).await;
    panel.login().await;

    panel
        .client
        .post(
            "/admin/photo-categories",
            json!({ "label": "Festas", "icon_label": "PartyPopper" }),
        )
        .await;
    upload(&mut panel, "Salão decorado", "Festas").await;

    let gallery = site.client.get("/gallery?category=Festas").await;
    assert_eq!(gallery.status, StatusCode::OK);
    assert_eq!(gallery.body["category"], "Festas");
    assert_eq!(gallery.body["photos"][0]["name"], "Salão decorado");
    assert_eq!(gallery.body["chips"][1]["label"], "Festas");
    assert_eq!(gallery.body["chips"][1]["active"], true);

    let dashboard = panel.client.get("/admin/dashboard").await;
    assert_eq!(dashboard.body["photos"], 1);
    assert_eq!(dashboard.body["photo_categories"], 1);
}
