//! Account service unit tests.
//!
//! Exercise the service over a mocked repository, so every branch of
//! the lookup-check-act sequences runs without a database.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use cuentas::domain::{CreateUser, NewUser, Password, SecretAnswer, User, UserRole};
use cuentas::errors::ApiError;
use cuentas::infra::MockUserRepository;
use cuentas::services::{AccountManager, AccountService, TokenIssuer};

const TEST_SECRET: &[u8] = b"test-secret-key-for-testing-32ch!";

fn issuer() -> TokenIssuer {
    TokenIssuer::with_secret(TEST_SECRET, 1, 15)
}

fn manager(repo: MockUserRepository) -> AccountManager {
    AccountManager::new(Arc::new(repo), issuer())
}

fn create_test_user(id: Uuid, password_hash: String, answer_hash: String) -> User {
    User {
        id,
        first_name: "Ana".to_string(),
        paternal_surname: "García".to_string(),
        maternal_surname: "López".to_string(),
        username: "anag".to_string(),
        email: "ana@example.com".to_string(),
        phone: "5550001111".to_string(),
        password_hash,
        secret_question: "¿Nombre de tu primera mascota?".to_string(),
        answer_hash,
        role: UserRole::User,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn user_from_new(id: Uuid, data: NewUser) -> User {
    let now = Utc::now();
    User {
        id,
        first_name: data.first_name,
        paternal_surname: data.paternal_surname,
        maternal_surname: data.maternal_surname,
        username: data.username,
        email: data.email,
        phone: data.phone,
        password_hash: data.password_hash,
        secret_question: data.secret_question,
        answer_hash: data.answer_hash,
        role: UserRole::User,
        created_at: now,
        updated_at: now,
    }
}

fn registration() -> CreateUser {
    CreateUser {
        first_name: "Ana".to_string(),
        paternal_surname: "García".to_string(),
        maternal_surname: "López".to_string(),
        username: "anag".to_string(),
        email: "ana@example.com".to_string(),
        phone: "5550001111".to_string(),
        password: "p1".to_string(),
        secret_question: "¿Nombre de tu primera mascota?".to_string(),
        secret_answer: "Fluffy".to_string(),
    }
}

#[tokio::test]
async fn register_stores_hashes_not_plain_text() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .withf(|data: &NewUser| {
            data.email == "ana@example.com"
                && data.password_hash != "p1"
                && data.password_hash.starts_with("$argon2")
                && data.answer_hash.starts_with("$argon2")
        })
        .returning(|data| Ok(user_from_new(Uuid::new_v4(), data)));

    let user = manager(repo).register(registration()).await.unwrap();

    // The stored hashes verify the original credentials.
    assert!(Password::from_hash(user.password_hash.clone()).verify("p1"));
    assert!(SecretAnswer::from_hash(user.answer_hash.clone()).verify("Fluffy"));
    assert_eq!(user.role, UserRole::User);
}

#[tokio::test]
async fn register_normalizes_the_secret_answer() {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .returning(|data| Ok(user_from_new(Uuid::new_v4(), data)));

    let mut data = registration();
    data.secret_answer = "  Mi   Primera Mascota ".to_string();
    let user = manager(repo).register(data).await.unwrap();

    let stored = SecretAnswer::from_hash(user.answer_hash);
    assert!(stored.verify("mi primera mascota"));
    assert!(stored.verify("MI PRIMERA MASCOTA"));
}

#[tokio::test]
async fn login_issues_token_carrying_the_stored_role() {
    let id = Uuid::new_v4();
    let password_hash = Password::new("p1").unwrap().into_string();
    let answer_hash = SecretAnswer::new("Fluffy").unwrap().into_string();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .withf(|email| email == "ana@example.com")
        .returning(move |_| {
            let mut user = create_test_user(id, password_hash.clone(), answer_hash.clone());
            user.role = UserRole::Admin;
            Ok(Some(user))
        });

    let outcome = manager(repo).login("ana@example.com", "p1").await.unwrap();

    assert_eq!(outcome.role, UserRole::Admin);
    assert_eq!(outcome.first_name, "Ana");

    let claims = issuer().verify_identity(&outcome.token).unwrap();
    assert_eq!(claims.sub, id);
    assert_eq!(claims.rol, "admin");
}

#[tokio::test]
async fn login_with_unknown_email_is_a_client_error() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(|_| Ok(None));

    let err = manager(repo).login("nadie@example.com", "p1").await;

    assert!(matches!(err, Err(ApiError::UnknownAccount)));
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let password_hash = Password::new("correcta").unwrap().into_string();
    let answer_hash = SecretAnswer::new("Fluffy").unwrap().into_string();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(move |_| {
        Ok(Some(create_test_user(
            Uuid::new_v4(),
            password_hash.clone(),
            answer_hash.clone(),
        )))
    });

    let err = manager(repo).login("ana@example.com", "incorrecta").await;

    assert!(matches!(err, Err(ApiError::InvalidPassword)));
}

#[tokio::test]
async fn update_role_returns_the_updated_record() {
    let id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_update_role()
        .with(eq(id), eq(UserRole::Admin))
        .returning(|id, role| {
            let mut user = create_test_user(id, "hash".to_string(), "hash".to_string());
            user.role = role;
            Ok(Some(user))
        });

    let user = manager(repo).update_role(id, UserRole::Admin).await.unwrap();

    assert_eq!(user.id, id);
    assert_eq!(user.role, UserRole::Admin);
}

#[tokio::test]
async fn update_role_for_missing_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_update_role().returning(|_, _| Ok(None));

    let err = manager(repo).update_role(Uuid::new_v4(), UserRole::Admin).await;

    assert!(matches!(err, Err(ApiError::UserNotFound)));
}

#[tokio::test]
async fn delete_succeeds_even_when_nothing_matches() {
    let id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_delete().with(eq(id)).times(2).returning(|_| Ok(()));

    let service = manager(repo);
    service.delete_user(id).await.unwrap();
    service.delete_user(id).await.unwrap();
}

#[tokio::test]
async fn verify_email_returns_the_account_id() {
    let id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .withf(|email| email == "ana@example.com")
        .returning(move |_| {
            Ok(Some(create_test_user(
                id,
                "hash".to_string(),
                "hash".to_string(),
            )))
        });

    let found = manager(repo).verify_email("ana@example.com").await.unwrap();

    assert_eq!(found, id);
}

#[tokio::test]
async fn recovery_lookups_report_missing_email() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(|_| Ok(None));

    let service = manager(repo);

    assert!(matches!(
        service.verify_email("nadie@example.com").await,
        Err(ApiError::EmailNotFound)
    ));
    assert!(matches!(
        service.secret_question("nadie@example.com").await,
        Err(ApiError::EmailNotFound)
    ));
    assert!(matches!(
        service.verify_answer("nadie@example.com", "Fluffy").await,
        Err(ApiError::EmailNotFound)
    ));
}

#[tokio::test]
async fn secret_question_returns_the_stored_question() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(|_| {
        Ok(Some(create_test_user(
            Uuid::new_v4(),
            "hash".to_string(),
            "hash".to_string(),
        )))
    });

    let question = manager(repo)
        .secret_question("ana@example.com")
        .await
        .unwrap();

    assert_eq!(question, "¿Nombre de tu primera mascota?");
}

#[tokio::test]
async fn correct_answer_yields_a_usable_ticket() {
    let answer_hash = SecretAnswer::new("Fluffy").unwrap().into_string();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(move |_| {
        Ok(Some(create_test_user(
            Uuid::new_v4(),
            "hash".to_string(),
            answer_hash.clone(),
        )))
    });

    // Normalization makes the spaced, differently-cased answer match.
    let ticket = manager(repo)
        .verify_answer("ana@example.com", "  fluffy ")
        .await
        .unwrap();

    let claims = issuer().verify_recovery(&ticket, "ana@example.com").unwrap();
    assert_eq!(claims.sub, "ana@example.com");
}

#[tokio::test]
async fn wrong_answer_is_rejected() {
    let answer_hash = SecretAnswer::new("Fluffy").unwrap().into_string();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(move |_| {
        Ok(Some(create_test_user(
            Uuid::new_v4(),
            "hash".to_string(),
            answer_hash.clone(),
        )))
    });

    let err = manager(repo).verify_answer("ana@example.com", "Rex").await;

    assert!(matches!(err, Err(ApiError::InvalidAnswer)));
}

#[tokio::test]
async fn change_password_stores_a_fresh_hash() {
    let ticket = issuer().recovery_ticket("ana@example.com").unwrap();

    let mut repo = MockUserRepository::new();
    repo.expect_update_password()
        .withf(|email, hash| {
            email == "ana@example.com"
                && Password::from_hash(hash.to_string()).verify("NuevaPass1")
        })
        .returning(|_, hash| {
            Ok(Some(create_test_user(
                Uuid::new_v4(),
                hash,
                "hash".to_string(),
            )))
        });

    manager(repo)
        .change_password("ana@example.com", "NuevaPass1", &ticket)
        .await
        .unwrap();
}

#[tokio::test]
async fn change_password_without_a_ticket_never_touches_the_store() {
    let mut repo = MockUserRepository::new();
    repo.expect_update_password().times(0);

    let err = manager(repo)
        .change_password("ana@example.com", "NuevaPass1", "not-a-ticket")
        .await;

    assert!(matches!(err, Err(ApiError::InvalidTicket)));
}

#[tokio::test]
async fn change_password_rejects_identity_tokens_as_tickets() {
    let user = create_test_user(Uuid::new_v4(), "hash".to_string(), "hash".to_string());
    let identity = issuer().identity_token(&user).unwrap();

    let mut repo = MockUserRepository::new();
    repo.expect_update_password().times(0);

    let err = manager(repo)
        .change_password(&user.email, "NuevaPass1", &identity)
        .await;

    assert!(matches!(err, Err(ApiError::InvalidTicket)));
}

#[tokio::test]
async fn change_password_rejects_tickets_for_other_emails() {
    let ticket = issuer().recovery_ticket("otra@example.com").unwrap();

    let mut repo = MockUserRepository::new();
    repo.expect_update_password().times(0);

    let err = manager(repo)
        .change_password("ana@example.com", "NuevaPass1", &ticket)
        .await;

    assert!(matches!(err, Err(ApiError::InvalidTicket)));
}

#[tokio::test]
async fn change_password_for_missing_email_is_not_found() {
    let ticket = issuer().recovery_ticket("ana@example.com").unwrap();

    let mut repo = MockUserRepository::new();
    repo.expect_update_password().returning(|_, _| Ok(None));

    let err = manager(repo)
        .change_password("ana@example.com", "NuevaPass1", &ticket)
        .await;

    assert!(matches!(err, Err(ApiError::EmailNotFound)));
}
