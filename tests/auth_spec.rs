use speculate2::speculate;
use ticket_desk::auth::{AuthError, Latency, SessionManager};
use ticket_desk::storage::*;
use tokio_test::block_on;

fn fresh_store() -> SqliteStore {
    let store = SqliteStore::open_memory().expect("Failed to create in-memory store");
    store.migrate().expect("Failed to run migrations");
    store
}

fn manager(store: &SqliteStore) -> SessionManager {
    SessionManager::new(StorageAdapter::new(store.clone()), Latency::None)
}

speculate! {
    before {
        let store = fresh_store();
        let auth = manager(&store);
    }

    describe "login" {
        it "succeeds for every stored account with its password" {
            let people = [("Ada", "ada@example.com", "pw-ada"), ("Bo", "bo@example.com", "pw-bo"), ("Cy", "cy@example.com", "pw-cy")];
            let mut created = Vec::new();
            for (name, email, password) in people {
                created.push(block_on(auth.signup(name, email, password)).expect("Signup failed"));
                auth.logout();
            }

            for (account, (_, email, password)) in created.iter().zip(people) {
                let logged_in = block_on(auth.login(email, password)).expect("Login failed");
                assert_eq!(logged_in.id, account.id);

                let current = auth.current_user().expect("No current user");
                assert_eq!(current.id, account.id);
                assert!(current.session_active);
                auth.logout();
            }
        }

        it "fails with AccountNotFound for an unknown email" {
            block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");
            auth.logout();

            assert_eq!(block_on(auth.login("nobody@example.com", "pw")), Err(AuthError::AccountNotFound));
            assert_eq!(auth.current_user(), None);
        }

        it "compares emails case-sensitively" {
            block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");
            auth.logout();

            assert_eq!(block_on(auth.login("Ada@Example.com", "pw")), Err(AuthError::AccountNotFound));
        }

        it "fails with InvalidCredentials for a wrong password" {
            block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");
            auth.logout();

            assert_eq!(block_on(auth.login("ada@example.com", "PW")), Err(AuthError::InvalidCredentials));
            assert!(!auth.is_session_active());
        }

        it "persists both records" {
            let account = block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");
            auth.logout();
            block_on(auth.login("ada@example.com", "pw")).expect("Login failed");

            let adapter = StorageAdapter::new(store.clone());
            let stored = adapter.load_current_user().expect("Current user not persisted");
            assert_eq!(stored.id, account.id);
            assert!(stored.session_active);
            assert!(adapter.load_directory()[0].session_active);
        }

        it "leaves other accounts' session flags untouched" {
            block_on(auth.signup("Ada", "ada@example.com", "pw-ada")).expect("Signup failed");
            auth.logout();
            block_on(auth.signup("Bo", "bo@example.com", "pw-bo")).expect("Signup failed");

            block_on(auth.login("ada@example.com", "pw-ada")).expect("Login failed");

            let flags: Vec<_> = auth.accounts().iter().map(|a| a.session_active).collect();
            assert_eq!(flags, vec![true, true]);
            assert_eq!(auth.current_user().map(|u| u.email), Some("ada@example.com".to_string()));
        }
    }

    describe "signup" {
        it "signs the new account in" {
            let account = block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");

            assert_eq!(account.name, "Ada");
            assert_eq!(account.password.as_deref(), Some("pw"));
            assert!(account.session_active);
            assert_eq!(auth.current_user(), Some(account));
        }

        it "appends to the directory in order" {
            block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");
            block_on(auth.signup("Bo", "bo@example.com", "pw")).expect("Signup failed");

            let emails: Vec<_> = auth.accounts().into_iter().map(|a| a.email).collect();
            assert_eq!(emails, vec!["ada@example.com", "bo@example.com"]);
        }

        it "gives every account a distinct id" {
            let a = block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");
            let b = block_on(auth.signup("Bo", "bo@example.com", "pw")).expect("Signup failed");
            assert!(!a.id.is_empty());
            assert_ne!(a.id, b.id);
        }

        it "fails with EmailTaken and leaves the directory unchanged" {
            block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");
            let before = auth.accounts();

            assert_eq!(block_on(auth.signup("Imposter", "ada@example.com", "other")), Err(AuthError::EmailTaken));
            assert_eq!(auth.accounts(), before);
            assert_eq!(StorageAdapter::new(store.clone()).load_directory(), before);
        }

        it "treats emails differing only in case as distinct" {
            block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");
            block_on(auth.signup("Ada", "ADA@example.com", "pw")).expect("Signup failed");
            assert_eq!(auth.accounts().len(), 2);
        }

        it "can be followed immediately by login" {
            let account = block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");
            let logged_in = block_on(auth.login("ada@example.com", "pw")).expect("Login failed");
            assert_eq!(logged_in.id, account.id);
        }
    }

    describe "logout" {
        it "clears the session everywhere" {
            block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");
            auth.logout();

            assert_eq!(auth.current_user(), None);
            assert!(!auth.is_session_active());
            assert!(!auth.accounts()[0].session_active);

            let adapter = StorageAdapter::new(store.clone());
            assert_eq!(adapter.load_current_user(), None);
            assert!(!adapter.load_directory()[0].session_active);
        }

        it "is idempotent" {
            block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");
            auth.logout();
            auth.logout();

            assert_eq!(auth.current_user(), None);
            assert_eq!(auth.accounts().len(), 1);
        }
    }

    describe "reload" {
        it "restores the session in a new manager" {
            let account = block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");

            let restarted = manager(&store);
            assert_eq!(restarted.current_user(), Some(account.clone()));
            assert!(restarted.is_session_active());
            assert_eq!(restarted.accounts(), vec![account]);
        }

        it "picks up records written elsewhere" {
            let other = manager(&store);
            block_on(other.signup("Bo", "bo@example.com", "pw")).expect("Signup failed");
            assert!(auth.accounts().is_empty());

            auth.reload();
            assert_eq!(auth.accounts().len(), 1);
            assert!(auth.is_session_active());
        }

        it "treats a corrupt current-user record as signed out" {
            block_on(auth.signup("Ada", "ada@example.com", "pw")).expect("Signup failed");
            store.set_item(CURRENT_USER_KEY, "not json").expect("Write failed");

            auth.reload();
            assert_eq!(auth.current_user(), None);
            assert_eq!(auth.accounts().len(), 1);
        }
    }
}
