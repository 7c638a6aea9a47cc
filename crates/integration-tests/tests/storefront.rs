//! Storefront router tests over in-memory backends.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::http::{StatusCode, header};
use serde_json::{Value, json};

use buffet_simone_core::catalog::{NewCategory, NewDish};
use buffet_simone_core::types::{CategoryId, Price};
use buffet_simone_integration_tests::{Storefront, storefront, wait_until};
use buffet_simone_store::document::to_fields;
use buffet_simone_store::{Collection, DocumentStore, LocalStore, NewPhoto, PhotoLibrary};

/// Put one category with one dish in the store and wait for the mirrors.
async fn seed_menu(site: &Storefront) -> String {
    let category_id = site
        .documents
        .create(
            Collection::Categories,
            to_fields(&NewCategory {
                name: "Salgados".into(),
                description: "Deliciosos salgados para sua festa".into(),
            })
            .unwrap(),
        )
        .await
        .unwrap();
    let dish_id = site
        .documents
        .create(
            Collection::Dishes,
            to_fields(&NewDish {
                name: "Coxinhas Premium".into(),
                description: "Coxinha de frango desfiado com catupiry".into(),
                price: Price::parse("4,50").unwrap(),
                popular: true,
                category_id: CategoryId::parse(&category_id).unwrap(),
            })
            .unwrap(),
        )
        .await
        .unwrap();

    wait_until(site.state.category_sync().watch(), |l| l.items.len() == 1).await;
    wait_until(site.state.dish_sync().watch(), |l| l.items.len() == 1).await;
    dish_id
}

#[tokio::test]
async fn test_health() {
    let mut site = storefront().await;
    let response = site.client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");

    let response = site.client.get("/health/ready").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let mut site = storefront().await;
    let response = site.client.get("/health").await;
    assert!(response.headers.contains_key("x-request-id"));
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_menu_groups_dishes_under_categories() {
    let mut site = storefront().await;
    seed_menu(&site).await;

    let response = site.client.get("/menu").await;
    assert_eq!(response.status, StatusCode::OK);

    let sections = response.body["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["name"], "Salgados");
    assert_eq!(sections[0]["items"][0]["name"], "Coxinhas Premium");
    assert_eq!(sections[0]["items"][0]["price"], "R$ 4,50");
    assert_eq!(
        sections[0]["items"][0]["description"],
        "Coxinha de frango desfiado com catupiry"
    );
    assert_eq!(sections[0]["items"][0]["popular"], true);
    assert_eq!(response.body["uncategorized"], json!([]));
    assert_eq!(response.body["stale"], false);
}

#[tokio::test]
async fn test_menu_keeps_last_list_when_feed_fails() {
    let mut site = storefront().await;
    seed_menu(&site).await;

    site.documents
        .fail_subscriptions(Collection::Dishes, "connection reset");
    wait_until(site.state.dish_sync().watch(), |l| l.stale).await;

    let response = site.client.get("/menu").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["stale"], true);
    assert_eq!(response.body["sections"][0]["items"][0]["name"], "Coxinhas Premium");

    let ready = site.client.get("/health/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn test_cart_add_and_remove_one_line() {
    let mut site = storefront().await;
    let dish_id = seed_menu(&site).await;

    let empty = site.client.get("/cart").await;
    assert_eq!(empty.body["count"], 0);
    assert_eq!(empty.body["total"], "0,00");

    site.client.post("/cart/add", json!({ "item_id": dish_id })).await;
    let response = site.client.post("/cart/add", json!({ "item_id": dish_id })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 2);
    assert_eq!(response.body["total"], "9,00");

    // Two lines for the same dish, each with its own id.
    let lines = response.body["lines"].as_array().unwrap();
    assert_ne!(lines[0]["id"], lines[1]["id"]);
    let first_line = lines[0]["id"].as_str().unwrap().to_owned();

    let response = site
        .client
        .post("/cart/remove", json!({ "line_id": first_line }))
        .await;
    assert_eq!(response.body["count"], 1);
    assert_eq!(response.body["total"], "4,50");

    // Removing it again is a no-op.
    let response = site
        .client
        .post("/cart/remove", json!({ "line_id": first_line }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 1);

    // The cart is kept in the session.
    let response = site.client.get("/cart").await;
    assert_eq!(response.body["count"], 1);
}

#[tokio::test]
async fn test_cart_is_per_session() {
    let mut site = storefront().await;
    let dish_id = seed_menu(&site).await;
    site.client.post("/cart/add", json!({ "item_id": dish_id })).await;

    let mut other = site.client.fresh();
    assert_eq!(other.get("/cart").await.body["count"], 0);
}

#[tokio::test]
async fn test_cart_cookie_ends_with_the_browser() {
    let mut site = storefront().await;
    let dish_id = seed_menu(&site).await;

    let response = site.client.post("/cart/add", json!({ "item_id": dish_id })).await;
    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("bs_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("Max-Age"));
    assert!(!cookie.contains("Expires"));
}

#[tokio::test]
async fn test_cart_rejects_unknown_item() {
    let mut site = storefront().await;
    seed_menu(&site).await;

    let response = site.client.post("/cart/add", json!({ "item_id": "nope" })).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = site.client.post("/cart/add", json!({ "item_id": "  " })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_contact_returns_whatsapp_link() {
    let mut site = storefront().await;
    let response = site
        .client
        .post(
            "/contact",
            json!({
                "nome": "Maria Souza",
                "telefone": "(11) 99999-9999",
                "email": "maria@example.com",
                "tipoEvento": "Casamento",
                "dataEvento": "2026-12-12",
                "numConvidados": "120",
                "detalhes": "Buffet completo",
                "temAlergia": "sim",
                "alergias": "amendoim"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let url = response.body["whatsapp_url"].as_str().unwrap();
    assert!(url.starts_with("https://api.whatsapp.com/send?phone=5511960882764&text="));
    assert!(url.contains("Maria%20Souza"));
    assert!(url.contains("amendoim"));
}

#[tokio::test]
async fn test_contact_reports_every_invalid_field() {
    let mut site = storefront().await;
    let response = site
        .client
        .post(
            "/contact",
            json!({
                "nome": "Jo",
                "telefone": "123",
                "email": "maria",
                "numConvidados": "0",
                "temAlergia": true,
                "alergias": ""
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = &response.body["errors"];
    assert_eq!(errors["nome"], "O nome parece muito curto.");
    assert_eq!(errors["telefone"], "Formato inválido. Ex: (11) 99999-9999");
    assert_eq!(errors["email"], "Digite um e-mail válido.");
    assert_eq!(errors["numConvidados"], "O número de convidados deve ser positivo.");
    assert_eq!(errors["alergias"], "Por favor, informe quais são as alergias.");
}

#[tokio::test]
async fn test_faq_search() {
    let mut site = storefront().await;

    let all = site.client.get("/faq").await;
    let total = all.body["entries"].as_array().unwrap().len();
    assert!(total > 1);

    let filtered = site.client.get("/faq?q=OR%C3%87AMENTO").await;
    let entries = filtered.body["entries"].as_array().unwrap();
    assert!(!entries.is_empty());
    assert!(entries.len() < total);
    assert_eq!(entries[0]["id"], "item-1");

    let none = site.client.get("/faq?q=xyzzy").await;
    assert_eq!(none.body["entries"], json!([]));
}

#[tokio::test]
async fn test_gallery_reads_photos_written_elsewhere() {
    let mut site = storefront().await;

    // The admin panel writes through its own library instance.
    let library = PhotoLibrary::load(Arc::clone(&site.local) as Arc<dyn LocalStore>)
        .await
        .unwrap();
    library.add_category("Doces", "Cookie").await.unwrap();
    library.add_category("Festas", "PartyPopper").await.unwrap();
    for (name, category) in [("Brigadeiros", "Doces"), ("Salão", "Festas")] {
        library
            .add_photo(NewPhoto {
                name: name.into(),
                description: String::new(),
                category: category.into(),
                content_type: "image/png".into(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            })
            .await
            .unwrap();
    }

    let response = site.client.get("/gallery").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["category"], "Todas");
    assert_eq!(response.body["photos"].as_array().unwrap().len(), 2);
    let chips: Vec<&Value> = response.body["chips"].as_array().unwrap().iter().collect();
    assert_eq!(chips.len(), 3);
    assert_eq!(chips[0]["active"], true);

    let response = site.client.get("/gallery?category=Doces").await;
    let photos = response.body["photos"].as_array().unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0]["name"], "Brigadeiros");
    assert!(
        photos[0]["image"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
}
