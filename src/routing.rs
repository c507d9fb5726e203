//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user,
    },
    category_page::get_category_page,
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    ledger_page::{get_expense_page, get_income_page},
    not_found::get_404_not_found,
    transaction::{create_transaction_endpoint, delete_transaction_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::INCOME_VIEW, get(get_income_page))
        .route(endpoints::EXPENSE_VIEW, get(get_expense_page))
        .route(endpoints::CATEGORY_VIEW, get(get_category_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // htmx requests need the HX-Redirect header to follow a redirect to the log-in page.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use scraper::Html;

    use crate::{
        auth::COOKIE_TOKEN,
        endpoints,
        routing::build_router,
        test_utils::{TEST_EMAIL, TEST_PASSWORD, select_text, test_app_state},
    };

    async fn get_test_server() -> TestServer {
        let app = build_router(test_app_state().await);

        TestServer::new(app)
    }

    async fn log_in(server: &TestServer) -> Cookie<'static> {
        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", TEST_EMAIL), ("password", TEST_PASSWORD)])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.cookie(COOKIE_TOKEN)
    }

    #[tokio::test]
    async fn pages_redirect_to_log_in_without_cookie() {
        let server = get_test_server().await;

        for page in [
            endpoints::DASHBOARD_VIEW,
            endpoints::INCOME_VIEW,
            endpoints::EXPENSE_VIEW,
            endpoints::CATEGORY_VIEW,
        ] {
            let response = server.get(page).await;

            response.assert_status(StatusCode::SEE_OTHER);
            let location = response.header("location");
            let location = location.to_str().unwrap();
            assert!(
                location.starts_with("/log_in?redirect_url="),
                "{page} redirected to {location}"
            );
        }
    }

    #[tokio::test]
    async fn api_uses_hx_redirect_without_cookie() {
        let server = get_test_server().await;

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[("type", "income"), ("amount", "500")])
            .await;

        response.assert_status_ok();
        assert!(
            response
                .header("hx-redirect")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn public_pages_are_reachable() {
        let server = get_test_server().await;

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
        server.get(endpoints::REGISTER_VIEW).await.assert_status_ok();
        server
            .get(endpoints::INTERNAL_ERROR_VIEW)
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        server
            .get("/static/app.css")
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server().await;

        server
            .get("/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn saved_transaction_shows_on_every_page() {
        let server = get_test_server().await;
        let cookie = log_in(&server).await;

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .add_cookie(cookie.clone())
            .form(&[
                ("type", "expense"),
                ("account", "เงินสด"),
                ("date", "2024-01-02"),
                ("category", "ค่าอาหาร"),
                ("amount", "150"),
                ("note", "ข้าวมันไก่"),
                ("redirect_url", endpoints::EXPENSE_VIEW),
            ])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("hx-redirect", "/expense?saved=1");

        let dashboard = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookie(cookie.clone())
            .await;
        dashboard.assert_status_ok();
        let html = Html::parse_document(&dashboard.text());
        assert_eq!(
            select_text(&html, "div[data-total] p"),
            vec!["THB 0.00", "THB 150.00"]
        );

        let expense = server
            .get("/expense?saved=1")
            .add_cookie(cookie.clone())
            .await;
        let html = Html::parse_document(&expense.text());
        assert_eq!(
            select_text(&html, "section[data-date] h3"),
            vec!["2024-01-02"]
        );
        assert_eq!(
            select_text(&html, "#alert-container p"),
            vec!["✅ บันทึกสำเร็จ"]
        );

        let category = server
            .get(endpoints::CATEGORY_VIEW)
            .add_cookie(cookie)
            .await;
        let html = Html::parse_document(&category.text());
        assert_eq!(
            html.select(&scraper::Selector::parse("div[data-category] li").unwrap())
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn log_out_clears_cookie() {
        let server = get_test_server().await;
        let cookie = log_in(&server).await;

        let response = server.get(endpoints::LOG_OUT).add_cookie(cookie).await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("location", endpoints::LOG_IN_VIEW);
        assert_eq!(
            response.cookie(COOKIE_TOKEN).expires_datetime(),
            Some(time::OffsetDateTime::UNIX_EPOCH)
        );
    }
}
