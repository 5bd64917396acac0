mod support;

use dairybook_client::SourcePaths;
use dairybook_client::commands::customers::{self, CustomersRunOptions};
use dairybook_client::commands::missing::{self, MissingRunOptions};
use dairybook_client::commands::outstanding::{self, OutstandingRunOptions};
use dairybook_client::commands::production::{self, ProductionRunOptions};
use serde_json::Value;
use support::billing_testkit::{
    assert_close, date, number, success_data, success_notices, temp_home_in_tmp, write_fixture,
};

fn reconcile_sources(base: &std::path::Path) -> SourcePaths {
    SourcePaths {
        morning: write_fixture(
            base,
            "morning.csv",
            "customer,date,qty\nSita Devi,2026-02-01,2\nSita Devi,2026-02-02,1\nRavi,2026-02-01,1\n",
        ),
        evening: write_fixture(base, "evening.csv", "customer,date,qty\nsita devi,2026-02-01,1\n"),
        payments: write_fixture(
            base,
            "payments.csv",
            "customer,amount,date\nSITA DEVI,100,2026-02-02\nRavi,20,2026-01-15\nKiran,50,2026-02-03\nRavi,15,\n",
        ),
        ledger: write_fixture(
            base,
            "ledger.csv",
            "Customer,Amount Billed,Payments Applied,Period End\nSita Devi,300,250,2026-01-31\nRavi,90,90,2026-01-31\nOldTimer,999,0,2026-01-31\n",
        ),
        ..SourcePaths::default()
    }
}

fn balance(row: &Value) -> (f64, f64, f64, f64) {
    (
        number(&row["prior_balance"]),
        number(&row["period_charge"]),
        number(&row["period_payments"]),
        number(&row["due_estimate"]),
    )
}

#[test]
fn outstanding_for_one_customer_uses_ledger_and_period_payments() {
    let temp = temp_home_in_tmp("dairybook-outstanding-one");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let data = success_data(outstanding::run_with_options(OutstandingRunOptions {
            customer: Some("Sita Devi".to_string()),
            from: "2026-02-01".to_string(),
            to: "2026-02-05".to_string(),
            sources: reconcile_sources(dir.path()),
            home_override: Some(&home),
            ..OutstandingRunOptions::default()
        }));

        assert_eq!(data["period_start"], "2026-02-01");
        assert_eq!(data["balance"]["customer_id"], "Sita Devi");
        let (prior, charge, payments, due) = balance(&data["balance"]);
        assert_close(prior, 50.0);
        assert_close(charge, 180.0);
        assert_close(payments, 100.0);
        assert_close(due, 130.0);
        assert_eq!(data["breakdown"].as_array().map(Vec::len), Some(0));
    }
}

#[test]
fn outstanding_price_flag_beats_customer_price_overrides() {
    let temp = temp_home_in_tmp("dairybook-outstanding-price");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        assert!(std::fs::write(home.join("config.json"), r#"{"customer_prices":{"A":40}}"#).is_ok());
        let sources = SourcePaths {
            morning: write_fixture(dir.path(), "morning.csv", "customer,date,qty\nA,2026-02-01,1\n"),
            ..SourcePaths::default()
        };
        let home_path = home.as_path();
        let options = move |price: Option<f64>| OutstandingRunOptions {
            customer: Some("A".to_string()),
            from: "2026-02-01".to_string(),
            to: "2026-02-01".to_string(),
            price,
            sources: sources.clone(),
            home_override: Some(home_path),
            ..OutstandingRunOptions::default()
        };

        let configured = success_data(outstanding::run_with_options(options(None)));
        assert_close(number(&configured["balance"]["period_charge"]), 40.0);

        let flagged = success_data(outstanding::run_with_options(options(Some(60.0))));
        assert_close(number(&flagged["balance"]["period_charge"]), 60.0);
    }
}

#[test]
fn outstanding_all_mode_excludes_ledger_only_customers() {
    let temp = temp_home_in_tmp("dairybook-outstanding-all");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let data = success_data(outstanding::run_with_options(OutstandingRunOptions {
            customer: None,
            from: "2026-02-01".to_string(),
            to: "2026-02-05".to_string(),
            sources: reconcile_sources(dir.path()),
            home_override: Some(&home),
            ..OutstandingRunOptions::default()
        }));

        assert_eq!(data["balance"]["customer_id"], "ALL");
        let (prior, charge, payments, due) = balance(&data["balance"]);
        assert_close(prior, 50.0);
        assert_close(charge, 225.0);
        assert_close(payments, 150.0);
        assert_close(due, 125.0);

        let names = data["breakdown"]
            .as_array()
            .map(|rows| {
                rows.iter()
                    .map(|row| row["customer_id"].as_str().unwrap_or_default().to_string())
                    .collect::<Vec<String>>()
            })
            .unwrap_or_default();
        assert_eq!(names, vec!["Kiran", "Ravi", "Sita Devi"]);
        assert_close(number(&data["breakdown"][0]["due_estimate"]), -50.0);
    }
}

#[test]
fn outstanding_rejects_reversed_periods() {
    let result = outstanding::run_with_options(OutstandingRunOptions {
        from: "2026-03-01".to_string(),
        to: "2026-02-01".to_string(),
        ..OutstandingRunOptions::default()
    });
    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.code, "invalid_argument");
        assert!(error.message.contains("from"));
    }
}

#[test]
fn customers_lists_delivery_customers_then_payment_only() {
    let temp = temp_home_in_tmp("dairybook-customers");
    assert!(temp.is_ok());
    if let Ok((dir, _home)) = temp {
        let sources = reconcile_sources(dir.path());
        let data = success_data(customers::run_with_options(CustomersRunOptions {
            sources,
            stdin_override: None,
        }));
        let rows = data["customers"].as_array().cloned().unwrap_or_default();
        let names = rows
            .iter()
            .map(|row| row["customer_id"].as_str().unwrap_or_default())
            .collect::<Vec<&str>>();
        assert_eq!(names, vec!["Ravi", "Sita Devi", "sita devi", "Kiran", "SITA DEVI"]);
        assert_eq!(rows[1]["first_delivery"], "2026-02-01");
        assert_eq!(rows[3]["source"], "payments");
        assert!(rows[3]["first_delivery"].is_null());
        assert_eq!(data["sources"].as_array().map(Vec::len), Some(3));
    }
}

#[test]
fn missing_scan_lists_incomplete_days_in_the_window() {
    let temp = temp_home_in_tmp("dairybook-missing");
    assert!(temp.is_ok());
    if let Ok((dir, _home)) = temp {
        let sources = SourcePaths {
            morning: write_fixture(
                dir.path(),
                "morning.csv",
                "customer,date,qty\nA,2026-04-09,1\nA,2026-04-10,1\nB,2026-04-10,1\nB,2026-04-01,1\n",
            ),
            evening: write_fixture(dir.path(), "evening.csv", "customer,date,qty\nA,2026-04-10,1\n"),
            ..SourcePaths::default()
        };
        let data = success_data(missing::run_with_options(MissingRunOptions {
            days: 2,
            today: date("2026-04-10"),
            sources,
            stdin_override: None,
        }));

        assert_eq!(data["window_start"], "2026-04-09");
        assert_eq!(data["window_end"], "2026-04-10");
        assert_eq!(data["customers_scanned"], 2);
        let rows = data["rows"].as_array().cloned().unwrap_or_default();
        let summary = rows
            .iter()
            .map(|row| {
                format!(
                    "{} {} {}",
                    row["date"].as_str().unwrap_or_default(),
                    row["customer_id"].as_str().unwrap_or_default(),
                    row["status"].as_str().unwrap_or_default()
                )
            })
            .collect::<Vec<String>>();
        assert_eq!(
            summary,
            vec![
                "2026-04-09 A evening_missing",
                "2026-04-09 B both_missing",
                "2026-04-10 B evening_missing",
            ]
        );
    }
}

#[test]
fn missing_rejects_zero_days() {
    let result = missing::run_with_options(MissingRunOptions {
        days: 0,
        today: date("2026-04-10"),
        ..MissingRunOptions::default()
    });
    assert!(result.is_err());
}

#[test]
fn missing_rejects_windows_longer_than_ten_years() {
    let result = missing::run_with_options(MissingRunOptions {
        days: 4_000_000_000,
        today: date("2026-04-10"),
        ..MissingRunOptions::default()
    });
    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.code, "invalid_argument");
        assert!(error.message.contains("3660"));
    }
}

#[test]
fn production_summary_splits_shifts_and_units() {
    let temp = temp_home_in_tmp("dairybook-production");
    assert!(temp.is_ok());
    if let Ok((dir, _home)) = temp {
        let production_path = write_fixture(
            dir.path(),
            "cows.csv",
            "Timestamp,Date,Cow,Shift,Milk (L),Feed (kg)\nx,2026-06-01,Gauri,Morning,6,3\nx,2026-06-01,Gauri,Evening,5,3\nx,2026-06-02,Kamdhenu,M,4,2\n",
        );
        let sources = SourcePaths {
            production: production_path,
            ..SourcePaths::default()
        };

        let bounded = success_data(production::run_with_options(ProductionRunOptions {
            from: Some("2026-06-01".to_string()),
            to: Some("2026-06-01".to_string()),
            sources: sources.clone(),
            stdin_override: None,
        }));
        assert_close(number(&bounded["total_qty"]), 11.0);
        assert_eq!(bounded["days"].as_array().map(Vec::len), Some(1));
        assert_close(number(&bounded["days"][0]["morning_qty"]), 6.0);
        assert_eq!(bounded["units"][0]["unit"], "Gauri");

        let all = success_data(production::run_with_options(ProductionRunOptions {
            sources,
            ..ProductionRunOptions::default()
        }));
        assert_close(number(&all["total_qty"]), 15.0);
        assert_eq!(all["units"].as_array().map(Vec::len), Some(2));
    }
}

#[test]
fn production_without_a_table_reports_a_notice() {
    let result = production::run_with_options(ProductionRunOptions::default());
    let notices = success_notices(&result);
    assert!(notices.iter().any(|notice| notice.contains("no production table")));
    let data = success_data(result);
    assert_close(number(&data["total_qty"]), 0.0);
}
