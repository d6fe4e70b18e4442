//! Use case and router tests for the payment crate

#[cfg(test)]
mod support {
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::sync::{Arc, Mutex};

    use auth::Principal;
    use chrono::{Duration, Utc};
    use customer::CustomerResult;
    use customer::domain::{ClientData, ClientDataRepository, NewClientData, Uid};
    use kernel::id::{ClientDataId, PaymentId};

    use crate::domain::payment::{NewPayment, Payment};
    use crate::domain::repository::PaymentRepository;
    use crate::domain::value_object::PurchaseId;
    use crate::error::{PaymentError, PaymentResult};

    /// Clones share the same store
    #[derive(Clone, Default)]
    pub struct MemoryPayments {
        rows: Arc<Mutex<Vec<Payment>>>,
        all_ids_taken: Arc<AtomicBool>,
        insert_fails: Arc<AtomicBool>,
        lookups: Arc<AtomicI64>,
    }

    impl MemoryPayments {
        /// Every purchase id reports as taken
        pub fn exhausted() -> Self {
            let repo = Self::default();
            repo.all_ids_taken.store(true, Ordering::SeqCst);
            repo
        }

        /// Every insert fails as if the pool were gone
        pub fn failing() -> Self {
            let repo = Self::default();
            repo.insert_fails.store(true, Ordering::SeqCst);
            repo
        }

        pub fn all(&self) -> Vec<Payment> {
            self.rows.lock().unwrap().clone()
        }

        pub fn purchase_id_lookups(&self) -> i64 {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    impl PaymentRepository for MemoryPayments {
        async fn exists_by_purchase_id(&self, purchase_id: PurchaseId) -> PaymentResult<bool> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.all_ids_taken.load(Ordering::SeqCst) {
                return Ok(true);
            }
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .any(|p| p.purchase_id == purchase_id))
        }

        async fn create(&self, payment: &NewPayment) -> PaymentResult<Payment> {
            if self.insert_fails.load(Ordering::SeqCst) {
                return Err(PaymentError::Database(sqlx::Error::PoolTimedOut));
            }
            let mut rows = self.rows.lock().unwrap();
            let id = rows.len() as i64 + 1;
            let stored = Payment {
                id: PaymentId::from_db(id),
                purchase_id: payment.purchase_id,
                transaction_id: payment.transaction_id.clone(),
                token: payment.token.clone(),
                status: payment.status,
                card: payment.card.clone(),
                cardholder: payment.cardholder.clone(),
                expiry_month: payment.expiry_month.clone(),
                expiry_year: payment.expiry_year.clone(),
                amount: payment.amount,
                currency: payment.currency.clone(),
                items: payment.items.clone(),
                address: payment.address.clone(),
                client_uid: payment.client_uid.clone(),
                client_data_id: payment.client_data_id,
                used_coupon: payment.used_coupon,
                paid_at: Utc::now() + Duration::seconds(id),
            };
            rows.push(stored.clone());
            Ok(stored)
        }

        async fn find_by_transaction_id(&self, transaction_id: &str) -> PaymentResult<Option<Payment>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.transaction_id == transaction_id)
                .cloned())
        }

        async fn find_all(&self) -> PaymentResult<Vec<Payment>> {
            let mut all = self.all();
            all.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
            Ok(all)
        }
    }

    /// Clones share the same store
    #[derive(Clone, Default)]
    pub struct MemoryClients {
        rows: Arc<Mutex<Vec<ClientData>>>,
    }

    impl MemoryClients {
        pub fn with_client(uid: &str, id: i64, coupon_used: bool) -> Self {
            let repo = Self::default();
            repo.rows.lock().unwrap().push(ClientData {
                id: ClientDataId::from_db(id),
                uid: Uid::from_db(uid.to_string()),
                email: None,
                image: None,
                coupon_used,
            });
            repo
        }

        pub fn coupon_used(&self, uid: &str) -> Option<bool> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.uid.as_str() == uid)
                .map(|c| c.coupon_used)
        }
    }

    impl ClientDataRepository for MemoryClients {
        async fn find_by_uid(&self, uid: &Uid) -> CustomerResult<Option<ClientData>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|c| &c.uid == uid)
                .cloned())
        }

        async fn create_if_absent(&self, _data: &NewClientData) -> CustomerResult<(ClientData, bool)> {
            unreachable!("payments never create client data")
        }

        async fn upsert(&self, _data: &NewClientData) -> CustomerResult<ClientData> {
            unreachable!("payments never create client data")
        }

        async fn set_coupon_used(&self, uid: &Uid, used: bool) -> CustomerResult<bool> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|c| &c.uid == uid) {
                Some(row) => {
                    row.coupon_used = used;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn claim_coupon(&self, uid: &Uid) -> CustomerResult<bool> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|c| &c.uid == uid && !c.coupon_used) {
                Some(row) => {
                    row.coupon_used = true;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn set_image(&self, _uid: &Uid, _image: &[u8]) -> CustomerResult<bool> {
            unreachable!("payments never touch client images")
        }
    }

    pub fn principal(subject: &str, roles: &[&str]) -> Principal {
        Principal {
            subject: subject.to_string(),
            username: Some(subject.to_string()),
            email: None,
            authorities: roles.iter().map(|r| format!("ROLE_{r}")).collect(),
        }
    }
}

#[cfg(test)]
mod use_case_tests {
    use super::support::*;
    use crate::application::*;
    use crate::domain::value_object::purchase_id::PURCHASE_ID_RANGE;
    use crate::error::PaymentError;
    use std::sync::Arc;

    fn checkout(amount: f64) -> PaymentInput {
        PaymentInput {
            card_number: Some("4111 1111 1111 1234".into()),
            cardholder_name: Some(" Ana Gomez ".into()),
            expiry_month: Some("07".into()),
            expiry_year: Some("2027".into()),
            amount: Some(amount),
            items: Some(r#"[{"productId":1,"quantity":1}]"#.into()),
            address: Some("Calle 10 # 4-21".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_process_masks_card_and_defaults() {
        let payments = MemoryPayments::default();
        let use_case = ProcessPaymentUseCase::new(
            Arc::new(payments.clone()),
            Arc::new(MemoryClients::default()),
        );

        let payment = use_case
            .execute(&principal("uid-ana", &["user"]), checkout(59_900.0))
            .await
            .unwrap();

        let card = payment.card.as_ref().unwrap();
        assert_eq!((card.bin(), card.last4()), ("411111", "1234"));
        assert_eq!(payment.cardholder.as_ref().unwrap().as_str(), "Ana Gomez");
        assert_eq!(payment.currency.as_str(), "COP");
        assert_eq!(payment.status.as_str(), "AUTHORIZED");
        assert!(payment.transaction_id.starts_with("txn_"));
        assert!(payment.token.starts_with("tok_"));
        assert!(PURCHASE_ID_RANGE.contains(&payment.purchase_id.value()));
        assert_eq!(payment.client_uid.as_deref(), Some("uid-ana"));
        assert!(payment.client_data_id.is_none());
        assert_eq!(payments.all().len(), 1);
    }

    #[tokio::test]
    async fn test_process_without_card_uses_placeholders() {
        let use_case = ProcessPaymentUseCase::new(
            Arc::new(MemoryPayments::default()),
            Arc::new(MemoryClients::default()),
        );
        let input = PaymentInput {
            amount: Some(10.0),
            ..Default::default()
        };

        let payment = use_case.execute(&principal("uid-ana", &[]), input).await.unwrap();
        let card = payment.card.unwrap();
        assert_eq!((card.bin(), card.last4()), ("000000", "0000"));
    }

    #[tokio::test]
    async fn test_process_rejects_bad_amount() {
        let use_case = ProcessPaymentUseCase::new(
            Arc::new(MemoryPayments::default()),
            Arc::new(MemoryClients::default()),
        );

        for amount in [None, Some(0.0), Some(-5.0)] {
            let input = PaymentInput {
                amount,
                ..Default::default()
            };
            let err = use_case.execute(&principal("uid-ana", &[]), input).await.unwrap_err();
            assert!(matches!(err, PaymentError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_coupon_is_consumed_once() {
        let clients = MemoryClients::with_client("uid-ana", 7, false);
        let use_case = ProcessPaymentUseCase::new(
            Arc::new(MemoryPayments::default()),
            Arc::new(clients.clone()),
        );
        let input = PaymentInput {
            used_coupon: true,
            client_data_id: Some("uid-ana".into()),
            ..checkout(100.0)
        };

        let payment = use_case
            .execute(&principal("uid-ana", &[]), input.clone())
            .await
            .unwrap();
        assert!(payment.used_coupon);
        assert_eq!(payment.client_data_id.map(|id| id.value()), Some(7));
        assert_eq!(clients.coupon_used("uid-ana"), Some(true));

        // Already used: the flag stays set and the payment still goes through
        use_case.execute(&principal("uid-ana", &[]), input).await.unwrap();
        assert_eq!(clients.coupon_used("uid-ana"), Some(true));
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_coupon_unused() {
        let clients = MemoryClients::with_client("uid-ana", 7, false);
        let input = PaymentInput {
            used_coupon: true,
            client_data_id: Some("uid-ana".into()),
            ..checkout(100.0)
        };

        let process = ProcessPaymentUseCase::new(
            Arc::new(MemoryPayments::failing()),
            Arc::new(clients.clone()),
        );
        let err = process
            .execute(&principal("uid-ana", &[]), input.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Database(_)));
        assert_eq!(clients.coupon_used("uid-ana"), Some(false));

        let save = SavePaymentUseCase::new(
            Arc::new(MemoryPayments::failing()),
            Arc::new(clients.clone()),
        );
        assert!(save.execute(&principal("uid-ana", &[]), input.clone()).await.is_err());
        assert_eq!(clients.coupon_used("uid-ana"), Some(false));

        let save = SavePaymentUseCase::new(
            Arc::new(MemoryPayments::default()),
            Arc::new(clients.clone()),
        );
        tokio_test::assert_ok!(save.execute(&principal("uid-ana", &[]), input).await);
        assert_eq!(clients.coupon_used("uid-ana"), Some(true));
    }

    #[tokio::test]
    async fn test_coupon_ignored_for_unknown_client() {
        let clients = MemoryClients::with_client("uid-ana", 7, false);
        let use_case = ProcessPaymentUseCase::new(
            Arc::new(MemoryPayments::default()),
            Arc::new(clients.clone()),
        );
        let input = PaymentInput {
            used_coupon: true,
            ..checkout(100.0)
        };

        let payment = use_case.execute(&principal("uid-bob", &[]), input).await.unwrap();
        assert_eq!(payment.client_uid.as_deref(), Some("uid-bob"));
        assert_eq!(clients.coupon_used("uid-ana"), Some(false));
    }

    #[tokio::test]
    async fn test_purchase_id_allocation_is_bounded() {
        let payments = MemoryPayments::exhausted();
        let use_case = ProcessPaymentUseCase::new(
            Arc::new(payments.clone()),
            Arc::new(MemoryClients::default()),
        );

        let err = use_case
            .execute(&principal("uid-ana", &[]), checkout(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::PurchaseIdExhausted));
        assert_eq!(payments.purchase_id_lookups(), MAX_PURCHASE_ID_ATTEMPTS as i64);
        assert!(payments.all().is_empty());
    }

    #[tokio::test]
    async fn test_save_keeps_request_currency_and_links_client() {
        let clients = MemoryClients::with_client("uid-ana", 3, false);
        let use_case = SavePaymentUseCase::new(
            Arc::new(MemoryPayments::default()),
            Arc::new(clients),
        );
        let input = PaymentInput {
            currency: Some("USD".into()),
            ..checkout(25.5)
        };

        let payment = use_case.execute(&principal("uid-ana", &[]), input).await.unwrap();
        assert_eq!(payment.currency.as_str(), "USD");
        assert!(!payment.transaction_id.starts_with("txn_"));
        assert_eq!(payment.transaction_id.len(), 36);
        assert_eq!(payment.client_data_id.map(|id| id.value()), Some(3));
    }

    #[tokio::test]
    async fn test_save_skips_short_card_and_rejects_bad_currency() {
        let use_case = SavePaymentUseCase::new(
            Arc::new(MemoryPayments::default()),
            Arc::new(MemoryClients::default()),
        );

        let input = PaymentInput {
            card_number: Some("12345".into()),
            amount: Some(5.0),
            ..Default::default()
        };
        let payment = use_case.execute(&principal("uid-ana", &[]), input).await.unwrap();
        assert!(payment.card.is_none());

        let input = PaymentInput {
            currency: Some("pesos".into()),
            amount: Some(5.0),
            ..Default::default()
        };
        let err = use_case.execute(&principal("uid-ana", &[]), input).await.unwrap_err();
        assert!(matches!(err, PaymentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_script_in_address_is_rejected() {
        let use_case = SavePaymentUseCase::new(
            Arc::new(MemoryPayments::default()),
            Arc::new(MemoryClients::default()),
        );
        let input = PaymentInput {
            address: Some("<script>alert(1)</script>".into()),
            ..checkout(5.0)
        };

        let err = use_case.execute(&principal("uid-ana", &[]), input).await.unwrap_err();
        assert!(matches!(err, PaymentError::Validation(_)));
    }

    #[tokio::test]
    async fn test_query_by_transaction_id() {
        let payments = MemoryPayments::default();
        let process = ProcessPaymentUseCase::new(
            Arc::new(payments.clone()),
            Arc::new(MemoryClients::default()),
        );
        let first = process.execute(&principal("uid-ana", &[]), checkout(1.0)).await.unwrap();
        let second = process.execute(&principal("uid-ana", &[]), checkout(2.0)).await.unwrap();

        let query = PaymentQueryUseCase::new(Arc::new(payments));
        let found = query.by_transaction_id(&first.transaction_id).await.unwrap();
        assert_eq!(found.id, first.id);

        let all = query.list().await.unwrap();
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);

        assert!(matches!(
            query.by_transaction_id("txn_missing").await.unwrap_err(),
            PaymentError::NotFound
        ));
    }
}

#[cfg(test)]
mod router_tests {
    use super::support::*;
    use crate::presentation::router::payment_router_generic;
    use auth::Principal;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(payments: MemoryPayments, clients: MemoryClients) -> Router {
        Router::new().nest("/api/payments", payment_router_generic(payments, clients))
    }

    fn request(method: Method, uri: &str, user: Principal, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri).extension(user);
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_process_response_never_contains_card_number() {
        let clients = MemoryClients::with_client("uid-ana", 9, false);
        let response = app(MemoryPayments::default(), clients.clone())
            .oneshot(request(
                Method::POST,
                "/api/payments/process",
                principal("uid-ana", &["user"]),
                Some(json!({
                    "cardNumber": "5500-0000-0000-0004",
                    "cardholderName": "Ana Gomez",
                    "expiryMonth": "12",
                    "expiryYear": "2028",
                    "amount": 150000,
                    "clientDataId": "uid-ana",
                    "usedCoupon": true
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "AUTHORIZED");
        assert_eq!(body["cardBin"], "550000");
        assert_eq!(body["cardLast4"], "0004");
        assert_eq!(body["currency"], "COP");
        assert_eq!(body["clientDataId"], "uid-ana");
        assert_eq!(body["usedCoupon"], true);
        assert!(!body.to_string().contains("5500000000000004"));
        assert!(body.get("cardNumber").is_none());
        assert_eq!(clients.coupon_used("uid-ana"), Some(true));
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let payments = MemoryPayments::default();
        let app = app(payments.clone(), MemoryClients::default());

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/payments/save",
                principal("uid-ana", &[]),
                Some(json!({
                    "cardNumber": "4111111111111111",
                    "amount": 42.0,
                    "currency": "USD",
                    "items": [{ "productId": 1 }],
                    "direccion": "Carrera 7"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let saved = body_json(response).await;
        assert_eq!(saved["address"], "Carrera 7");
        assert_eq!(saved["items"], r#"[{"productId":1}]"#);

        let transaction_id = saved["transactionId"].as_str().unwrap().to_string();
        let response = app
            .oneshot(request(
                Method::GET,
                &format!("/api/payments/{transaction_id}"),
                principal("uid-ana", &[]),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let found = body_json(response).await;
        assert_eq!(found["currency"], "USD");
        assert_eq!(found["cardLast4"], "1111");
    }

    #[tokio::test]
    async fn test_unknown_transaction_is_404() {
        let response = app(MemoryPayments::default(), MemoryClients::default())
            .oneshot(request(
                Method::GET,
                "/api/payments/txn_unknown",
                principal("uid-ana", &[]),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_amount_is_400() {
        let response = app(MemoryPayments::default(), MemoryClients::default())
            .oneshot(request(
                Method::POST,
                "/api/payments/process",
                principal("uid-ana", &[]),
                Some(json!({ "amount": 0 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_requires_admin() {
        let app = app(MemoryPayments::default(), MemoryClients::default());

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/payments", principal("uid-ana", &["user"]), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(request(Method::GET, "/api/payments", principal("root", &["admin"]), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }
}
