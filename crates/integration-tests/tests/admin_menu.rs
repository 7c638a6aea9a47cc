//! Dish and category maintenance through the admin panel.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use buffet_simone_integration_tests::{
    Admin, admin_with, logged_in_admin, storefront_with, wait_until,
};
use buffet_simone_store::{Collection, DocumentStore, InMemoryDocumentStore, MemoryLocalStore};

async fn add_category(panel: &mut Admin, name: &str) -> String {
    let response = panel
        .client
        .post(
            "/admin/categories",
            json!({ "name": name, "description": "Deliciosos salgados para sua festa" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["message"], "Categoria criada com sucesso!");
    let id = response.body["id"].as_str().unwrap().to_owned();

    let wanted = id.clone();
    wait_until(panel.state.category_sync().watch(), move |l| {
        l.items.iter().any(|c| c.id.as_str() == wanted)
    })
    .await;
    id
}

async fn add_dish(panel: &mut Admin, name: &str, price: &str, category_id: &str) -> String {
    let response = panel
        .client
        .post(
            "/admin/dishes",
            json!({ "name": name, "price": price, "category_id": category_id }),
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["message"], "Prato adicionado com sucesso!");
    let id = response.body["id"].as_str().unwrap().to_owned();

    let wanted = id.clone();
    wait_until(panel.state.dish_sync().watch(), move |l| {
        l.items.iter().any(|d| d.id.as_str() == wanted)
    })
    .await;
    id
}

#[tokio::test]
async fn test_add_category_and_dish() {
    let mut panel = logged_in_admin().await;
    let category_id = add_category(&mut panel, "Salgados").await;
    add_dish(&mut panel, "Coxinhas Premium", "R$ 4,50", &category_id).await;

    let dishes = panel.client.get("/admin/dishes").await;
    assert_eq!(dishes.status, StatusCode::OK);
    let row = &dishes.body["dishes"][0];
    assert_eq!(row["name"], "Coxinhas Premium");
    assert_eq!(row["price"], "R$ 4,50");
    assert_eq!(row["category_id"], category_id.as_str());
    assert_eq!(row["category_name"], "Salgados");
    assert_eq!(dishes.body["stale"], false);

    let categories = panel.client.get("/admin/categories").await;
    assert_eq!(categories.body["categories"][0]["name"], "Salgados");
    assert_eq!(categories.body["categories"][0]["dishes"], 1);

    let dashboard = panel.client.get("/admin/dashboard").await;
    assert_eq!(dashboard.body["dishes"], 1);
    assert_eq!(dashboard.body["categories"], 1);
    assert_eq!(dashboard.body["photos"], 0);
}

#[tokio::test]
async fn test_invalid_forms_report_every_field() {
    let mut panel = logged_in_admin().await;

    let response = panel
        .client
        .post("/admin/dishes", json!({ "name": "", "price": "abc", "category_id": "" }))
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = &response.body["errors"];
    assert_eq!(errors["nome"], "Preencha todos os campos!");
    assert_eq!(errors["preco"], "Preço inválido.");
    assert_eq!(errors["categoriaId"], "Preencha todos os campos!");

    let response = panel.client.post("/admin/categories", json!({})).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body["errors"]["nome"].is_string());
    assert!(response.body["errors"]["descricao"].is_string());

    // Nothing was written.
    assert!(panel.documents.list(Collection::Dishes).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_dish() {
    let mut panel = logged_in_admin().await;
    let category_id = add_category(&mut panel, "Salgados").await;
    let dish_id = add_dish(&mut panel, "Coxinhas", "4,50", &category_id).await;

    let response = panel
        .client
        .put(
            &format!("/admin/dishes/{dish_id}"),
            json!({ "name": "Coxinhas Premium", "price": "5", "category_id": category_id }),
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["message"], "Prato editado com sucesso!");

    let list = wait_until(panel.state.dish_sync().watch(), |l| {
        l.items.iter().any(|d| d.name == "Coxinhas Premium")
    })
    .await;
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].price.to_string(), "R$ 5,00");

    let missing = panel
        .client
        .put(
            "/admin/dishes/not-there",
            json!({ "name": "X", "price": "1", "category_id": category_id }),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_needs_confirmation() {
    let mut panel = logged_in_admin().await;
    let category_id = add_category(&mut panel, "Doces").await;
    let dish_id = add_dish(&mut panel, "Brigadeiros Gourmet", "3,20", &category_id).await;
    let uri = format!("/admin/dishes/{dish_id}");

    for declined in [uri.clone(), format!("{uri}?confirm=false")] {
        let response = panel.client.delete(&declined).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["outcome"], "cancelled");
        assert_eq!(response.body["message"], "Exclusão cancelada.");
    }
    assert_eq!(panel.state.dishes().items.len(), 1);

    let response = panel.client.delete(&format!("{uri}?confirm=true")).await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["outcome"], "deleted");
    assert_eq!(response.body["message"], "Prato excluído com sucesso!");
    wait_until(panel.state.dish_sync().watch(), |l| l.items.is_empty()).await;

    let again = panel.client.delete(&format!("{uri}?confirm=true")).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_category_orphans_its_dishes() {
    let mut panel = logged_in_admin().await;
    let category_id = add_category(&mut panel, "Bebidas").await;
    add_dish(&mut panel, "Café Expresso", "4,00", &category_id).await;

    let response = panel
        .client
        .delete(&format!("/admin/categories/{category_id}?confirm=true"))
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["message"], "Categoria excluída com sucesso!");
    wait_until(panel.state.category_sync().watch(), |l| l.items.is_empty()).await;

    let dishes = panel.client.get("/admin/dishes").await;
    assert_eq!(dishes.body["dishes"][0]["name"], "Café Expresso");
    assert!(dishes.body["dishes"][0]["category_name"].is_null());
}

#[tokio::test]
async fn test_store_outage_is_reported() {
    let mut panel = logged_in_admin().await;
    let category_id = add_category(&mut panel, "Salgados").await;

    panel.documents.set_reject_writes(true);
    let response = panel
        .client
        .post(
            "/admin/dishes",
            json!({ "name": "Pastel de Queijo", "price": "3,80", "category_id": category_id }),
        )
        .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["error"], "Serviço indisponível, tente novamente.");

    panel.documents.set_reject_writes(false);
    add_dish(&mut panel, "Pastel de Queijo", "3,80", &category_id).await;
}

#[tokio::test]
async fn test_stale_feed_fails_readiness() {
    let mut panel = logged_in_admin().await;
    assert_eq!(panel.client.get("/health/ready").await.status, StatusCode::OK);

    panel
        .documents
        .fail_subscriptions(Collection::Categories, "feed lost");
    wait_until(panel.state.category_sync().watch(), |l| l.stale).await;

    assert_eq!(
        panel.client.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(panel.client.get("/admin/categories").await.body["stale"], true);
}

#[tokio::test]
async fn test_storefront_sees_admin_changes() {
    let documents = Arc::new(InMemoryDocumentStore::new());
    let mut panel = admin_with(Arc::clone(&documents), Arc::new(MemoryLocalStore::new())).await;
    let mut site = storefront_with(documents, Arc::new(MemoryLocalStore::new())).await;
    panel.login().await;

    let category_id = add_category(&mut panel, "Pratos Principais").await;
    let response = panel
        .client
        .post(
            "/admin/dishes",
            json!({
                "name": "Picanha na Chapa",
                "description": "Corte nobre com acompanhamentos",
                "price": "55,00",
                "popular": true,
                "category_id": category_id
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    let dish_id = response.body["id"].as_str().unwrap().to_owned();

    wait_until(site.state.dish_sync().watch(), |l| l.items.len() == 1).await;
    wait_until(site.state.category_sync().watch(), |l| l.items.len() == 1).await;

    let menu = site.client.get("/menu").await;
    let section = &menu.body["sections"][0];
    assert_eq!(section["name"], "Pratos Principais");
    let item = &section["items"][0];
    assert_eq!(item["id"], dish_id.as_str());
    assert_eq!(item["price"], "R$ 55,00");
    assert_eq!(item["description"], "Corte nobre com acompanhamentos");
    assert_eq!(item["popular"], true);
}

#[tokio::test]
async fn test_price_above_maximum_rejected() {
    let mut panel = logged_in_admin().await;
    let category_id = add_category(&mut panel, "Salgados").await;

    let response = panel
        .client
        .post(
            "/admin/dishes",
            json!({
                "name": "Banquete",
                "price": "R$ 50.000.000.000.000.000.000.000.000.000,00",
                "category_id": category_id
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["errors"]["preco"], "O preço máximo é R$ 1.000.000,00.");
    assert!(panel.documents.list(Collection::Dishes).await.unwrap().is_empty());
}
