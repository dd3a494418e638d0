//! The dashboard page: balance cards and a table of transactions.
//!
//! Every request for the page is a fresh view. It loads the transactions
//! once, then renders whatever the view holds. A failed load renders the
//! same as a view with no data yet: an empty table and blank balances.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    api::HttpTransactionsApi,
    endpoints,
    html::{
        CARD_HIGHLIGHT_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    loader::{DashboardLoader, TeardownToken},
    navigation::NavBar,
    transaction::TransactionType,
    view_state::{DisplayBalance, DisplayTransaction, ViewState},
};

const INCOME_STYLE: &str = "text-green-600 dark:text-green-400";
const OUTCOME_STYLE: &str = "text-red-600 dark:text-red-400";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The client for the transactions service.
    pub api: HttpTransactionsApi,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// Display the balance and transactions.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let loader = DashboardLoader::new(state.api);

    // The view lives as long as this request. If the client goes away axum
    // drops this future, which drops the pending request with it.
    if let Err(error) = loader.load(TeardownToken::never()).await {
        tracing::debug!("rendering dashboard without data: {error}");
    }

    let view_state = loader.holder().snapshot()?.view_state();

    Ok(dashboard_view(&view_state).into_response())
}

fn dashboard_view(view_state: &ViewState) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-lg"
            {
                (balance_cards(&view_state.balance))
                (transactions_table(&view_state.transactions))
            }
        }
    );

    base("Dashboard", &content)
}

fn balance_cards(balance: &DisplayBalance) -> Markup {
    html!(
        section class="grid grid-cols-1 md:grid-cols-3 gap-8 -mt-4 mb-8"
        {
            (balance_card("Entradas", "balance-income", &balance.income, CARD_STYLE))
            (balance_card("Saídas", "balance-outcome", &balance.outcome, CARD_STYLE))
            (balance_card("Total", "balance-total", &balance.total, CARD_HIGHLIGHT_STYLE))
        }
    )
}

fn balance_card(label: &str, test_id: &str, amount: &str, style: &str) -> Markup {
    html!(
        div class=(style)
        {
            header class="flex items-center justify-between"
            {
                p class="text-base" { (label) }
            }

            h1 data-testid=(test_id) class="mt-4 text-4xl font-medium"
            {
                (amount)
            }
        }
    )
}

fn transactions_table(transactions: &[DisplayTransaction]) -> Markup {
    html!(
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Título" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Preço" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Categoria" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Data" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        tr id={"transaction-" (transaction.id)} class=(TABLE_ROW_STYLE)
                        {
                            td class={"title " (TABLE_CELL_STYLE) " text-gray-900 dark:text-white"}
                            {
                                (transaction.title)
                            }
                            td class={
                                (transaction.transaction_type.as_str()) " "
                                (TABLE_CELL_STYLE) " "
                                (amount_color_class(transaction.transaction_type))
                            }
                            {
                                (transaction.formatted_value)
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.category.title) }
                            td class=(TABLE_CELL_STYLE) { (transaction.formatted_date) }
                        }
                    }
                }
            }
        }
    )
}

fn amount_color_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => INCOME_STYLE,
        TransactionType::Outcome => OUTCOME_STYLE,
    }
}
