use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Stylist,
}

#[derive(Clone, Debug)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stylist {
    pub id: i64,
    pub name: String,
    pub rating: f64,
    pub review_count: u32,
    pub is_verified: bool,
    pub introduction: String,
    pub career: Vec<String>,
    pub profile_image_url: String,
    pub specialty_styles: Vec<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// RFC 3339.
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub category: String,
    pub image_url: String,
    pub recommended_body_type: Vec<String>,
    pub advice: Option<String>,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: String,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub preferred_style: Vec<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBody {
    pub access_token: String,
}

/// Seed data for a server instance.
#[derive(Clone, Debug, Default)]
pub struct MockData {
    pub accounts: Vec<Account>,
    pub stylists: Vec<Stylist>,
    pub items: Vec<Item>,
}

impl MockData {
    /// The data set the standalone binary serves.
    pub fn demo() -> Self {
        let jan_first_ms = 1_704_067_200_000;
        let jan_first = "2024-01-01T00:00:00.000Z".to_string();
        Self {
            accounts: vec![
                Account {
                    id: 1,
                    email: "demo@codicue.app".into(),
                    password: "password".into(),
                    name: "데모".into(),
                    role: Role::User,
                },
                Account {
                    id: 2,
                    email: "stylist@codicue.app".into(),
                    password: "password".into(),
                    name: "김스타".into(),
                    role: Role::Stylist,
                },
            ],
            stylists: vec![
                Stylist {
                    id: 1,
                    name: "김스타".into(),
                    rating: 4.8,
                    review_count: 128,
                    is_verified: true,
                    introduction: "미니멀 룩 전문 스타일리스트".into(),
                    career: vec!["패션 매거진 어시스턴트 3년".into(), "퍼스널 스타일링 5년".into()],
                    profile_image_url: "https://images.codicue.app/stylists/1.png".into(),
                    specialty_styles: vec!["미니멀".into(), "포멀".into()],
                    created_at: jan_first_ms,
                    updated_at: jan_first.clone(),
                },
                Stylist {
                    id: 2,
                    name: "이코디".into(),
                    rating: 4.5,
                    review_count: 42,
                    is_verified: false,
                    introduction: String::new(),
                    career: vec![],
                    profile_image_url: String::new(),
                    specialty_styles: vec!["스트릿".into()],
                    created_at: jan_first_ms,
                    updated_at: jan_first.clone(),
                },
            ],
            items: vec![
                Item {
                    id: 1,
                    user_id: 1,
                    name: "화이트 셔츠".into(),
                    category: "TOP".into(),
                    image_url: "https://example.com/image.jpg".into(),
                    recommended_body_type: vec!["RECTANGLE".into(), "HOURGLASS".into()],
                    advice: Some("깔끔한 비즈니스 룩에 적합합니다.".into()),
                    tags: vec!["비즈니스".into(), "깔끔".into(), "화이트".into()],
                    created_at: jan_first_ms,
                    updated_at: jan_first.clone(),
                },
                Item {
                    id: 2,
                    user_id: 1,
                    name: "아이보리 하프팬츠".into(),
                    category: "BOTTOM".into(),
                    image_url: "https://example.com/pants.webp".into(),
                    recommended_body_type: vec!["RECTANGLE".into()],
                    advice: None,
                    tags: vec!["아이보리".into(), "팬츠".into()],
                    created_at: jan_first_ms,
                    updated_at: jan_first,
                },
            ],
        }
    }
}

#[derive(Debug, Default)]
pub struct Store {
    accounts: Vec<Account>,
    tokens: HashMap<String, i64>,
    stylists: Vec<Stylist>,
    items: Vec<Item>,
}

pub type Db = Arc<RwLock<Store>>;

type Rejection = (StatusCode, Json<serde_json::Value>);

fn reject(status: StatusCode, message: &str) -> Rejection {
    (status, Json(json!({ "message": message })))
}

/// An empty server: no accounts, stylists or items.
pub fn app() -> Router {
    app_with(MockData::default())
}

pub fn app_with(data: MockData) -> Router {
    let db: Db = Arc::new(RwLock::new(Store {
        accounts: data.accounts,
        tokens: HashMap::new(),
        stylists: data.stylists,
        items: data.items,
    }));
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/stylist/login", post(stylist_login))
        .route("/user", post(register))
        .route("/stylists", get(list_stylists))
        .route("/user/items", get(list_items))
        .route("/user/items/{id}", delete(delete_item))
        .with_state(db)
}

/// A server that answers every request with `status` (500 if invalid).
pub fn failing_app(status: u16) -> Router {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Router::new().fallback(move || async move { reject(status, "simulated failure") })
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn issue_token(db: &Db, account_id: i64) -> TokenBody {
    let token = Uuid::new_v4().to_string();
    db.write().await.tokens.insert(token.clone(), account_id);
    TokenBody { access_token: token }
}

async fn authenticate(db: &Db, role: Role, input: LoginInput) -> Result<Json<TokenBody>, Rejection> {
    let account_id = {
        let store = db.read().await;
        store
            .accounts
            .iter()
            .find(|a| a.role == role && a.email == input.email && a.password == input.password)
            .map(|a| a.id)
    };
    match account_id {
        Some(id) => Ok(Json(issue_token(db, id).await)),
        None => {
            tracing::info!(email = %input.email, ?role, "login rejected");
            Err(reject(StatusCode::UNAUTHORIZED, "invalid email or password"))
        }
    }
}

async fn login(State(db): State<Db>, Json(input): Json<LoginInput>) -> Result<Json<TokenBody>, Rejection> {
    authenticate(&db, Role::User, input).await
}

async fn stylist_login(
    State(db): State<Db>,
    Json(input): Json<LoginInput>,
) -> Result<Json<TokenBody>, Rejection> {
    authenticate(&db, Role::Stylist, input).await
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<TokenBody>), Rejection> {
    let id = {
        let mut store = db.write().await;
        if store.accounts.iter().any(|a| a.email == input.email) {
            return Err(reject(StatusCode::CONFLICT, "email already registered"));
        }
        let id = store.accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        store.accounts.push(Account {
            id,
            email: input.email,
            password: input.password,
            name: input.name,
            role: Role::User,
        });
        id
    };
    tracing::info!(id, height = %input.height, weight = %input.weight, styles = ?input.preferred_style, "registered user");
    Ok((StatusCode::CREATED, Json(issue_token(&db, id).await)))
}

async fn list_stylists(State(db): State<Db>) -> Json<Vec<Stylist>> {
    Json(db.read().await.stylists.clone())
}

/// Resolve the caller from `Authorization`. The raw token is accepted after
/// either `Bearer ` or `Basic `.
async fn caller(db: &Db, headers: &HeaderMap) -> Result<i64, Rejection> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("Basic ")))
        .map(str::trim)
        .unwrap_or_default();
    db.read()
        .await
        .tokens
        .get(token)
        .copied()
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "missing or unknown token"))
}

async fn list_items(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Vec<Item>>, Rejection> {
    let user_id = caller(&db, &headers).await?;
    let store = db.read().await;
    Ok(Json(
        store.items.iter().filter(|i| i.user_id == user_id).cloned().collect(),
    ))
}

async fn delete_item(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, Rejection> {
    let user_id = caller(&db, &headers).await?;
    let mut store = db.write().await;
    let before = store.items.len();
    store.items.retain(|i| !(i.id == id && i.user_id == user_id));
    if store.items.len() == before {
        return Err(reject(StatusCode::NOT_FOUND, "item not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
