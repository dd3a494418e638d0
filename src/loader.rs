//! Loads the dashboard's data once per view and holds the result.
//!
//! A view goes through `Uninitialized -> Loading -> Loaded` when its data
//! loads, or `Uninitialized -> Loading -> Failed` otherwise. There is no way
//! back to `Loading`: a view loads at most once.

use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::watch;

use crate::{
    Error,
    api::TransactionsApi,
    view_state::{ViewState, transform},
};

/// Where a view is in its single load.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    /// No load has been started.
    #[default]
    Uninitialized,
    /// The request to the transactions service is in flight.
    Loading,
    /// The data arrived and was transformed.
    Loaded(ViewState),
    /// The load failed. The view keeps showing its initial empty values.
    Failed(Error),
}

impl LoadState {
    /// The view state to render.
    ///
    /// Anything other than [LoadState::Loaded] renders as an empty table and
    /// blank balances.
    pub fn view_state(&self) -> ViewState {
        match self {
            LoadState::Loaded(view_state) => view_state.clone(),
            _ => ViewState::default(),
        }
    }
}

/// Shared, replace-only storage for a view's [LoadState].
///
/// The state is only ever replaced as a whole, so readers never see the
/// transactions of one load with the balance of another.
#[derive(Debug, Clone, Default)]
pub struct ViewStateHolder {
    state: Arc<RwLock<LoadState>>,
}

impl ViewStateHolder {
    /// A copy of the current state.
    ///
    /// # Errors
    /// Returns [Error::ViewStateLockError] if the lock was poisoned.
    pub fn snapshot(&self) -> Result<LoadState, Error> {
        self.state
            .read()
            .inspect_err(|error| tracing::error!("could not acquire view state lock: {error}"))
            .map(|state| state.clone())
            .map_err(|_| Error::ViewStateLockError)
    }

    fn replace(&self, new_state: LoadState) -> Result<(), Error> {
        let mut state = self
            .state
            .write()
            .inspect_err(|error| tracing::error!("could not acquire view state lock: {error}"))
            .map_err(|_| Error::ViewStateLockError)?;

        *state = new_state;

        Ok(())
    }
}

/// Create a linked pair for tearing down a view.
///
/// The [Teardown] stays with whoever owns the view, the [TeardownToken] is
/// handed to [DashboardLoader::load].
pub fn teardown_channel() -> (Teardown, TeardownToken) {
    let (sender, receiver) = watch::channel(false);

    (Teardown { sender }, TeardownToken { receiver })
}

/// Signals that a view has been torn down.
#[derive(Debug)]
pub struct Teardown {
    sender: watch::Sender<bool>,
}

impl Teardown {
    /// Mark the view as torn down. Any load still waiting on the network
    /// gives up and its response is never stored.
    pub fn tear_down(&self) {
        self.sender.send_replace(true);
    }
}

/// Lets a load find out whether its view has been torn down.
///
/// Dropping the [Teardown] without calling [Teardown::tear_down] means the
/// view is never torn down.
#[derive(Debug, Clone)]
pub struct TeardownToken {
    receiver: watch::Receiver<bool>,
}

impl TeardownToken {
    /// A token for a view that is never torn down explicitly, e.g. one whose
    /// load is cancelled by dropping its future instead.
    pub fn never() -> Self {
        let (_, token) = teardown_channel();
        token
    }

    /// Whether the view has been torn down.
    pub fn is_torn_down(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Wait until the view is torn down.
    async fn torn_down(&mut self) {
        if self.receiver.wait_for(|torn_down| *torn_down).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Fetches, transforms and stores a view's data, once.
#[derive(Debug)]
pub struct DashboardLoader<A> {
    api: A,
    holder: ViewStateHolder,
    started: AtomicBool,
}

impl<A: TransactionsApi> DashboardLoader<A> {
    /// Create a loader for a new view.
    pub fn new(api: A) -> Self {
        Self {
            api,
            holder: ViewStateHolder::default(),
            started: AtomicBool::new(false),
        }
    }

    /// The view's state, for rendering.
    pub fn holder(&self) -> &ViewStateHolder {
        &self.holder
    }

    /// Fetch the transactions, transform them and store the result.
    ///
    /// Only the first call does anything. The holder ends up
    /// [LoadState::Loaded] on success and [LoadState::Failed] otherwise.
    ///
    /// # Errors
    /// - [Error::AlreadyLoaded] if this is not the first call, no request is
    ///   made and the holder is not touched,
    /// - [Error::TornDown] if the view was torn down before the data arrived,
    /// - any error from the request or [transform].
    pub async fn load(&self, mut teardown: TeardownToken) -> Result<ViewState, Error> {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::warn!("ignoring repeated dashboard load");
            return Err(Error::AlreadyLoaded);
        }

        self.holder.replace(LoadState::Loading)?;
        tracing::debug!("loading dashboard");

        let result = tokio::select! {
            biased;
            _ = teardown.torn_down() => Err(Error::TornDown),
            response = self.api.get_transactions() => response.and_then(transform),
        };

        let result = match result {
            Ok(_) if teardown.is_torn_down() => Err(Error::TornDown),
            result => result,
        };

        match result {
            Ok(view_state) => {
                tracing::debug!(
                    "loaded dashboard with {} transactions",
                    view_state.transactions.len()
                );
                self.holder
                    .replace(LoadState::Loaded(view_state.clone()))?;
                Ok(view_state)
            }
            Err(Error::TornDown) => {
                tracing::debug!("view torn down before the dashboard loaded");
                self.holder.replace(LoadState::Failed(Error::TornDown))?;
                Err(Error::TornDown)
            }
            Err(error) => {
                tracing::error!("could not load dashboard: {error}");
                self.holder.replace(LoadState::Failed(error.clone()))?;
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::{
        Error,
        api::TransactionsApi,
        timestamp::Timestamp,
        transaction::{
            BalanceField, RawBalance, RawCategory, RawTransaction, TransactionType,
            TransactionsResponse,
        },
        view_state::ViewState,
    };

    use super::{DashboardLoader, LoadState, TeardownToken, teardown_channel};

    struct StubApi {
        response: Result<TransactionsResponse, Error>,
        calls: AtomicUsize,
        hang: bool,
    }

    impl StubApi {
        fn returning(response: Result<TransactionsResponse, Error>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
                hang: false,
            }
        }

        fn hanging() -> Self {
            Self {
                hang: true,
                ..Self::returning(Ok(salary_response("5000")))
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TransactionsApi for &StubApi {
        async fn get_transactions(&self) -> Result<TransactionsResponse, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.hang {
                std::future::pending::<()>().await;
            }

            self.response.clone()
        }
    }

    fn salary_response(total: &str) -> TransactionsResponse {
        TransactionsResponse {
            transactions: vec![RawTransaction {
                id: "1".to_owned(),
                title: "Salary".to_owned(),
                transaction_type: TransactionType::Income,
                value: 5000.0,
                category: RawCategory {
                    id: "c1".to_owned(),
                    title: "Salary".to_owned(),
                },
                created_at: Timestamp::parse("2020-05-10").unwrap(),
            }],
            balance: RawBalance {
                income: BalanceField::new("5000"),
                outcome: BalanceField::new("0"),
                total: BalanceField::new(total),
            },
        }
    }

    #[tokio::test]
    async fn starts_uninitialized() {
        let api = StubApi::returning(Ok(salary_response("5000")));
        let loader = DashboardLoader::new(&api);

        assert_eq!(loader.holder().snapshot(), Ok(LoadState::Uninitialized));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn stores_loaded_view_state() {
        let api = StubApi::returning(Ok(salary_response("5000")));
        let loader = DashboardLoader::new(&api);

        let view_state = loader.load(TeardownToken::never()).await.unwrap();

        assert_eq!(view_state.transactions.len(), 1);
        assert_eq!(view_state.transactions[0].formatted_value, " 5.000,00");
        assert_eq!(view_state.balance.total, "R$ 5.000,00");
        assert_eq!(
            loader.holder().snapshot(),
            Ok(LoadState::Loaded(view_state))
        );
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn loads_only_once() {
        let api = StubApi::returning(Ok(salary_response("5000")));
        let loader = DashboardLoader::new(&api);
        let first = loader.load(TeardownToken::never()).await.unwrap();

        let second = loader.load(TeardownToken::never()).await;

        assert_eq!(second, Err(Error::AlreadyLoaded));
        assert_eq!(api.calls(), 1);
        assert_eq!(loader.holder().snapshot(), Ok(LoadState::Loaded(first)));
    }

    #[tokio::test]
    async fn failed_request_leaves_view_empty() {
        let api = StubApi::returning(Err(Error::UnexpectedStatus(500)));
        let loader = DashboardLoader::new(&api);

        let result = loader.load(TeardownToken::never()).await;

        assert_eq!(result, Err(Error::UnexpectedStatus(500)));
        let state = loader.holder().snapshot().unwrap();
        assert_eq!(state, LoadState::Failed(Error::UnexpectedStatus(500)));
        assert_eq!(state.view_state(), ViewState::default());
    }

    #[tokio::test]
    async fn invalid_balance_fails_the_load() {
        let api = StubApi::returning(Ok(salary_response("lots")));
        let loader = DashboardLoader::new(&api);

        let result = loader.load(TeardownToken::never()).await;

        let want = Error::InvalidBalanceField {
            field: "total",
            value: "lots".to_owned(),
        };
        assert_eq!(result, Err(want.clone()));
        assert_eq!(loader.holder().snapshot(), Ok(LoadState::Failed(want)));
    }

    #[tokio::test]
    async fn torn_down_view_is_never_updated() {
        let api = StubApi::returning(Ok(salary_response("5000")));
        let loader = DashboardLoader::new(&api);
        let (teardown, token) = teardown_channel();
        teardown.tear_down();

        let result = loader.load(token).await;

        assert_eq!(result, Err(Error::TornDown));
        assert_eq!(
            loader.holder().snapshot().unwrap().view_state(),
            ViewState::default()
        );
    }

    #[tokio::test]
    async fn teardown_interrupts_pending_request() {
        let api = StubApi::hanging();
        let loader = DashboardLoader::new(&api);
        let (teardown, token) = teardown_channel();

        let (result, _) = tokio::join!(loader.load(token), async {
            tokio::task::yield_now().await;
            teardown.tear_down();
        });

        assert_eq!(result, Err(Error::TornDown));
        assert_eq!(api.calls(), 1);
        assert_eq!(
            loader.holder().snapshot(),
            Ok(LoadState::Failed(Error::TornDown))
        );
    }

    #[tokio::test]
    async fn dropped_teardown_does_not_cancel() {
        let api = StubApi::returning(Ok(salary_response("5000")));
        let loader = DashboardLoader::new(&api);
        let (teardown, token) = teardown_channel();
        drop(teardown);

        let result = loader.load(token).await;

        assert!(result.is_ok(), "got {result:?}");
    }
}
