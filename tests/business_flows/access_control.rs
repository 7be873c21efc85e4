//! Roles, sessions and read-only databases

use crate::test_utils::*;
use niaga::{Access, AccessMode, Command, Error, Niaga, OpenOptions, Output, Role};

fn login(session: &niaga::Session, user: &str, password: &str) -> niaga::Result<Output> {
    session.execute(Command::Login {
        username: user.into(),
        password: password.into(),
    })
}

#[test]
fn cashier_grows_into_manager() {
    let niaga = shop_at(clock(at(2025, 8, 3, 9)));
    let kasir = niaga
        .users()
        .register("kasir1", "kasir1@toko.id", "rahasia1", "rahasia1")
        .unwrap();
    assert_eq!(kasir.role, Role::Cashier);

    let till = niaga.new_session();
    assert_eq!(
        till.execute(Command::SaverList).unwrap_err(),
        Error::Unauthenticated
    );
    login(&till, "kasir1", "rahasia1").unwrap();

    till.execute(Command::SavingsDeposit {
        request: savings("Eko", 10_000),
    })
    .unwrap();
    assert_eq!(
        till.execute(Command::ProductList).unwrap_err(),
        Error::AccessDenied {
            required: Access::Manager
        }
    );

    niaga.users().set_role(kasir.id, Role::Manager).unwrap();
    assert!(matches!(
        till.execute(Command::ProductList).unwrap(),
        Output::Products(_)
    ));
    assert_eq!(
        till.execute(Command::UserList).unwrap_err(),
        Error::AccessDenied {
            required: Access::Admin
        }
    );

    niaga.users().toggle_active(kasir.id).unwrap();
    assert_eq!(
        till.execute(Command::SaverList).unwrap_err(),
        Error::Unauthenticated
    );
    assert_eq!(
        login(&niaga.new_session(), "kasir1", "rahasia1").unwrap_err(),
        Error::InvalidCredentials
    );
}

#[test]
fn registration_is_validated() {
    let niaga = shop_at(clock(at(2025, 8, 3, 9)));
    let users = niaga.users();

    assert_eq!(
        users
            .register("budi", "budi@toko.id", "12345", "12345")
            .unwrap_err()
            .code(),
        "invalid_input"
    );
    assert_eq!(
        users
            .register("budi", "budi@toko.id", "rahasia1", "rahasia2")
            .unwrap_err()
            .code(),
        "invalid_input"
    );
    users
        .register("budi", "budi@toko.id", "rahasia1", "rahasia1")
        .unwrap();
    assert_eq!(
        users
            .register("budi", "lain@toko.id", "rahasia1", "rahasia1")
            .unwrap_err()
            .code(),
        "already_exists"
    );

    let session = niaga.new_session();
    assert_eq!(
        login(&session, "budi", "salah123").unwrap_err(),
        Error::InvalidCredentials
    );
    assert!(!session.is_logged_in());
}

#[test]
fn logout_forgets_the_user() {
    let niaga = shop_at(clock(at(2025, 8, 3, 9)));
    assert_eq!(niaga.whoami().unwrap().unwrap().username, ADMIN);
    niaga.logout().unwrap();
    assert!(niaga.whoami().unwrap().is_none());
    assert_eq!(niaga.savings().list().unwrap_err(), Error::Unauthenticated);
}

#[test]
fn read_only_database_refuses_writes() {
    let dir = tempfile::tempdir().unwrap();
    {
        let niaga = Niaga::open(dir.path()).unwrap();
        niaga.login(ADMIN, ADMIN_PASSWORD).unwrap();
        niaga.savings().deposit(savings("Lina", 12_000)).unwrap();
    }

    let niaga = Niaga::open_with(
        dir.path(),
        OpenOptions::new().access_mode(AccessMode::ReadOnly),
    )
    .unwrap();
    niaga.login(ADMIN, ADMIN_PASSWORD).unwrap();
    assert_eq!(niaga.savings().balance("Lina").unwrap().balance, rp(12_000));
    assert_eq!(
        niaga.savings().deposit(savings("Lina", 1_000)).unwrap_err(),
        Error::ReadOnly
    );
}
