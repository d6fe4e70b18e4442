//! HTTP Handlers

use std::sync::Arc;

use auth::CurrentUser;
use axum::Json;
use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use platform::clamav::VirusScanner;
use platform::image::ImageValidator;
use platform::multipart::{MultipartError, MultipartForm};

use crate::application::{
    ClientImageUseCase, GetOrCreateClientUseCase, IMAGE_UPDATED_MESSAGE, SaveClientDataInput,
    SaveClientDataUseCase, SetCouponUseCase, UpdateClientImageUseCase,
};
use crate::domain::repository::ClientDataRepository;
use crate::error::{CustomerError, CustomerResult};
use crate::presentation::dto::{ClientDataDto, CouponQuery, CouponResponse, ErrorBody, MessageResponse};

/// Multipart field names
pub const EMAIL_FIELD: &str = "correo";
pub const IMAGE_FIELD: &str = "imagen";
pub const COUPON_FIELD: &str = "usoCodigoDescuento";

/// Stored pictures are served as JPEG
pub const CLIENT_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Shared state for client data handlers
pub struct CustomerAppState<R, S>
where
    R: ClientDataRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub images: ImageValidator<S>,
}

impl<R, S> Clone for CustomerAppState<R, S>
where
    R: ClientDataRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            images: self.images.clone(),
        }
    }
}

async fn read_form(req: Request) -> CustomerResult<MultipartForm> {
    let multipart = Multipart::from_request(req, &())
        .await
        .map_err(|rejection| MultipartError::Malformed(rejection.body_text()))?;
    Ok(MultipartForm::read(multipart, &[IMAGE_FIELD]).await?)
}

/// GET /api/client-data/{uid}
///
/// 200 with the existing record, 201 when it was created just now.
pub async fn get_or_create<R, S>(
    State(state): State<CustomerAppState<R, S>>,
    CurrentUser(principal): CurrentUser,
    Path(uid): Path<String>,
) -> CustomerResult<(StatusCode, Json<ClientDataDto>)>
where
    R: ClientDataRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let use_case = GetOrCreateClientUseCase::new(state.repo.clone());
    let output = use_case.execute(uid, principal.email.as_deref()).await?;

    let status = if output.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(output.client.into())))
}

/// PUT /api/client-data/{uid}/toggle-coupon?useCoupon=bool
pub async fn toggle_coupon<R, S>(
    State(state): State<CustomerAppState<R, S>>,
    Path(uid): Path<String>,
    Query(query): Query<CouponQuery>,
) -> Response
where
    R: ClientDataRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let use_case = SetCouponUseCase::new(state.repo.clone());

    match use_case.execute(uid, query.use_coupon).await {
        Ok(used) => Json(CouponResponse {
            uso_codigo_descuento: used,
        })
        .into_response(),
        Err(CustomerError::ClientNotFound) => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: CustomerError::ClientNotFound.to_string(),
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/client-data (multipart: `correo`, `imagen`?, `usoCodigoDescuento`)
pub async fn save<R, S>(
    State(state): State<CustomerAppState<R, S>>,
    CurrentUser(principal): CurrentUser,
    req: Request,
) -> CustomerResult<Json<ClientDataDto>>
where
    R: ClientDataRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let mut form = read_form(req).await?;
    let input = SaveClientDataInput {
        email: form.text(EMAIL_FIELD).map(str::to_string),
        coupon_used: form.flag(COUPON_FIELD)?,
        image: form.take_file(IMAGE_FIELD),
    };

    let use_case = SaveClientDataUseCase::new(state.repo.clone(), state.images.clone());
    let saved = use_case.execute(&principal, input).await?;

    Ok(Json(saved.into()))
}

/// PUT /api/client-data/{uid}/image (multipart: `imagen`)
pub async fn update_image<R, S>(
    State(state): State<CustomerAppState<R, S>>,
    CurrentUser(principal): CurrentUser,
    Path(uid): Path<String>,
    req: Request,
) -> CustomerResult<Json<MessageResponse>>
where
    R: ClientDataRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let mut form = read_form(req).await?;

    let use_case = UpdateClientImageUseCase::new(state.repo.clone(), state.images.clone());
    use_case
        .execute(&principal, uid, form.take_file(IMAGE_FIELD))
        .await?;

    Ok(Json(MessageResponse {
        message: IMAGE_UPDATED_MESSAGE.to_string(),
    }))
}

/// GET /api/client-data/{uid}/image
pub async fn get_image<R, S>(
    State(state): State<CustomerAppState<R, S>>,
    Path(uid): Path<String>,
) -> CustomerResult<Response>
where
    R: ClientDataRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let image = ClientImageUseCase::new(state.repo.clone()).execute(uid).await?;
    Ok(([(header::CONTENT_TYPE, CLIENT_IMAGE_CONTENT_TYPE)], image).into_response())
}
