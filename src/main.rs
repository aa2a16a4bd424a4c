//! Retirement Analytics CLI
//!
//! Command-line interface over a member book CSV

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use retirement_analytics::allocation::{
    plan_rebalance, recommend_with_trace, resolve_current, AllocationMix, AllocationProfile,
    AllocationRecommendation, RebalancePlan,
};
use retirement_analytics::config::EngineConfig;
use retirement_analytics::contribution::{recommend_contributions, ContributionPlan};
use retirement_analytics::member::{find_member, load_members, MemberRecord, RiskTolerance};
use retirement_analytics::projection::MarketScenario;
use retirement_analytics::risk::{classify, risk_alert, RiskAlert, RiskDistribution, RiskStatus};
use retirement_analytics::scenario::{what_if, WhatIfRequest, WhatIfResult};
use retirement_analytics::stress::{stress_test, StressReport};
use retirement_analytics::segmentation::{
    members_in_cluster, segment, ClusteringBackend, SegmentationFilters, SegmentationResult,
    FEATURE_NAMES,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "retirement-analytics")]
#[command(about = "Allocation, risk, projection and segmentation analytics for plan members")]
struct Cli {
    /// Member book CSV
    members: PathBuf,

    /// JSON file overriding engine defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Full report for one member
    Member {
        id: String,

        /// Market outlook for the what-if projection (conservative, moderate, aggressive)
        #[arg(long, default_value = "moderate", value_parser = parse_scenario)]
        scenario: MarketScenario,

        /// Project the what-if in real terms
        #[arg(long)]
        inflation_adjusted: bool,

        /// Change to the yearly contribution
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        contribution_delta: f64,

        /// Change to the retirement age, in years
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        retirement_age_delta: i32,

        /// Advisor-edited current mix: stocks bonds cash
        #[arg(long, num_args = 3, value_names = ["STOCKS", "BONDS", "CASH"])]
        current_mix: Option<Vec<f64>>,
    },

    /// Cluster the member book
    Segment {
        /// Number of clusters
        #[arg(short, long)]
        k: Option<usize>,

        #[arg(long, value_parser = parse_backend)]
        backend: Option<ClusteringBackend>,

        #[arg(long)]
        age_min: Option<u32>,
        #[arg(long)]
        age_max: Option<u32>,
        #[arg(long)]
        income_min: Option<f64>,
        #[arg(long)]
        income_max: Option<f64>,

        /// Keep only these risk tolerances (repeatable)
        #[arg(long, value_parser = parse_risk)]
        risk: Vec<RiskTolerance>,

        /// List the members of one cluster, highest savings first
        #[arg(long)]
        list: Option<usize>,
    },

    /// Allocation and withdrawal risk for every member
    Book,
}

fn parse_scenario(s: &str) -> Result<MarketScenario, String> {
    MarketScenario::parse(s).ok_or_else(|| format!("unknown market scenario '{}'", s))
}

fn parse_backend(s: &str) -> Result<ClusteringBackend, String> {
    match s {
        "lloyd" => Ok(ClusteringBackend::Lloyd),
        "fixed_iteration" | "fixed" => Ok(ClusteringBackend::FixedIteration),
        _ => Err(format!("unknown clustering backend '{}'", s)),
    }
}

fn parse_risk(s: &str) -> Result<RiskTolerance, String> {
    RiskTolerance::from_label(s).ok_or_else(|| format!("unknown risk tolerance '{}'", s))
}

/// JSON envelope for every command
#[derive(Serialize)]
struct Report<T: Serialize> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    body: T,
}

fn emit_json<T: Serialize>(body: T) -> Result<()> {
    let report = Report {
        generated_at: Utc::now(),
        body,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[derive(Serialize)]
struct MemberReport {
    member: MemberRecord,
    allocation: AllocationRecommendation,
    rebalance: RebalancePlan,
    risk: RiskAlert,
    contributions: ContributionPlan,
    what_if: WhatIfResult,
    stress: StressReport,
}

#[derive(Serialize)]
struct BookRow {
    member_id: String,
    target: AllocationMix,
    withdrawal_rate: f64,
    status: RiskStatus,
}

#[derive(Serialize)]
struct BookReport {
    members: Vec<BookRow>,
    distribution: RiskDistribution,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let start = Instant::now();
    let members = load_members(&cli.members)
        .with_context(|| format!("Failed to load members from {}", cli.members.display()))?;
    log::info!("Loaded {} members in {:?}", members.len(), start.elapsed());

    match cli.command {
        Command::Member {
            id,
            scenario,
            inflation_adjusted,
            contribution_delta,
            retirement_age_delta,
            current_mix,
        } => {
            let member = find_member(&members, &id).ok_or_else(|| anyhow!("Member {} not found", id))?;
            let request = WhatIfRequest {
                scenario,
                inflation_adjusted,
                contribution_delta,
                retirement_age_delta,
            };
            let overridden = current_mix.map(|v| [v[0], v[1], v[2]]);
            let report = member_report(member, &config, &request, overridden);
            if cli.json {
                emit_json(report)?;
            } else {
                print_member(&report);
            }
        }
        Command::Segment {
            k,
            backend,
            age_min,
            age_max,
            income_min,
            income_max,
            risk,
            list,
        } => {
            let mut seg_config = config.segmentation.clone();
            if let Some(k) = k {
                seg_config.clusters = k;
            }
            if let Some(backend) = backend {
                seg_config.backend = backend;
            }
            let filters = SegmentationFilters {
                age: range(age_min, age_max, 0, u32::MAX),
                income: range(income_min, income_max, 0.0, f64::INFINITY),
                risk_tolerance: risk,
            };
            let result = segment(&members, &filters, &seg_config).context("Segmentation failed")?;

            if cli.json {
                emit_json(&result)?;
            } else {
                print_segments(&result);
            }
            if let Some(cluster) = list {
                print_cluster_members(&result, &members, cluster);
            }
        }
        Command::Book => {
            let report = book_report(&members);
            if cli.json {
                emit_json(report)?;
            } else {
                print_book(&report);
            }
        }
    }

    Ok(())
}

fn range<T: Copy>(lo: Option<T>, hi: Option<T>, floor: T, ceiling: T) -> Option<(T, T)> {
    match (lo, hi) {
        (None, None) => None,
        (lo, hi) => Some((lo.unwrap_or(floor), hi.unwrap_or(ceiling))),
    }
}

fn member_report(
    member: &MemberRecord,
    config: &EngineConfig,
    request: &WhatIfRequest,
    overridden: Option<[f64; 3]>,
) -> MemberReport {
    let allocation = recommend_with_trace(&AllocationProfile::from_member(member));
    let current = resolve_current(Some(&member.investment_type), overridden);
    let rebalance = plan_rebalance(
        member.current_savings,
        current,
        allocation.mix,
        config.rebalance.drift_tolerance,
    );

    MemberReport {
        member: member.clone(),
        allocation,
        rebalance,
        risk: risk_alert(member, &config.projection),
        contributions: recommend_contributions(member, &config.projection),
        what_if: what_if(member, request, &config.projection),
        stress: stress_test(member, &config.projection),
    }
}

fn book_report(members: &[MemberRecord]) -> BookReport {
    let start = Instant::now();

    let rows: Vec<BookRow> = members
        .par_iter()
        .map(|member| {
            let target = recommend_with_trace(&AllocationProfile::from_member(member)).mix;
            let (withdrawal_rate, status) = classify(
                member.current_savings.unwrap_or(0.0),
                member.monthly_expenses.unwrap_or(0.0),
            );
            BookRow {
                member_id: member.member_id.clone(),
                target,
                withdrawal_rate,
                status,
            }
        })
        .collect();

    log::info!("Book of {} members evaluated in {:?}", rows.len(), start.elapsed());
    let distribution = RiskDistribution::from_statuses(rows.iter().map(|r| r.status));
    BookReport {
        members: rows,
        distribution,
    }
}

fn print_mix(label: &str, mix: &AllocationMix) {
    println!(
        "  {:<10} stocks {:>5.1}%  bonds {:>5.1}%  cash {:>5.1}%",
        label, mix.stocks, mix.bonds, mix.cash
    );
}

fn print_member(report: &MemberReport) {
    let m = &report.member;
    println!("Member: {}", m.member_id);
    println!(
        "  Age: {}{}",
        m.age.map_or("-".to_string(), |a| a.to_string()),
        if m.is_retired() { " (retired)" } else { "" }
    );
    println!("  Risk tolerance: {}", m.risk_tolerance.as_str());
    println!("  Pension: {}  Withdrawal: {}", m.pension_type, m.withdrawal_strategy);
    println!();

    println!("Allocation (rules: {})", report.allocation.rules_fired.join(", "));
    print_mix("Current", &report.rebalance.current);
    print_mix("Target", &report.rebalance.target);
    match report.rebalance.action {
        Some(action) => {
            println!("  Rebalance: {:?}", action);
            for trade in &report.rebalance.trades {
                println!(
                    "    {:?} {} ${:.0} ({:.1}%)",
                    trade.side, trade.asset_class, trade.amount, trade.percentage
                );
            }
        }
        None => println!(
            "  Within {:.1} pt drift tolerance",
            report.rebalance.drift_tolerance
        ),
    }
    println!();

    let risk = &report.risk;
    println!("Withdrawal risk: {} ({:.2}%)", risk.status, risk.withdrawal_rate * 100.0);
    match risk.years_of_coverage {
        Some(year) => println!("  Savings exhausted in year {} of {}", year, risk.horizon_years),
        None => println!("  Savings outlast the {}-year horizon", risk.horizon_years),
    }
    println!();

    let plan = &report.contributions;
    println!(
        "Contributions: {} years to retirement, goal ${:.0}",
        plan.years_to_retirement, plan.retirement_goal
    );
    for s in &plan.scenarios {
        println!(
            "  {:<20} ${:>9.0}/yr -> ${:>12.0} (range ${:.0} to ${:.0})",
            s.name, s.annual_contribution, s.projected_value, s.pessimistic_value, s.optimistic_value
        );
    }
    println!("  Recommended: ${:.0}/yr", plan.recommended_contribution);
    println!();

    let w = &report.what_if;
    let summary = w.scenario.summary();
    println!(
        "What-if ({}{}): ${:.0} vs baseline ${:.0} ({:+.0})",
        w.request.scenario.as_str(),
        if w.request.inflation_adjusted { ", real" } else { "" },
        w.scenario_final,
        w.baseline_final,
        w.difference
    );
    println!(
        "  {} years: ${:.0} contributed, ${:.0} growth",
        summary.years, summary.total_contributions, summary.total_growth
    );
    println!();

    print_stress(&report.stress);
}

fn print_stress(stress: &StressReport) {
    println!(
        "Stress tests ({} years, current plan ${:.0})",
        stress.years_to_retirement, stress.baseline_value
    );
    for m in &stress.markets {
        println!(
            "  {:<20} {:>6.2}% -> ${:>12.0} ({})",
            m.market.name,
            m.blended_return * 100.0,
            m.projected_value,
            m.vs_baseline_pct.map_or("-".to_string(), |p| format!("{:+.0}%", p))
        );
    }
    let i = &stress.inflation;
    println!(
        "  {:<20} {:>6.2}% -> ${:>12.0}",
        format!("Inflation {:.1}%", i.inflation * 100.0),
        i.real_return * 100.0,
        i.projected_value
    );
    let l = &stress.longevity;
    println!(
        "  Longevity to {}: ${:.0}/yr for {} years, {}",
        l.life_expectancy,
        l.annual_withdrawal,
        l.retirement_years,
        if l.sufficient { "sufficient" } else { "insufficient" }
    );
    println!("  Sensitivity:");
    for p in &stress.sweeps {
        println!("    {:<22} ${:>12.0} ({:+.0})", p.label, p.projected_value, p.difference);
    }
}

fn print_segments(result: &SegmentationResult) {
    println!(
        "Segmented {} members into {} clusters ({} iterations, converged: {})",
        result.total_members,
        result.profiles.len(),
        result.assignment.iterations,
        result.assignment.converged
    );
    println!(
        "  Medians: income ${:.0}, savings ${:.0}",
        result.median_income, result.median_savings
    );
    for (name, (mean, sd)) in FEATURE_NAMES
        .iter()
        .zip(result.scaler.means.iter().zip(&result.scaler.std_devs))
    {
        println!("  {:<16} mean {:>12.1}  sd {:>12.1}", name, mean, sd);
    }
    println!();

    for ((profile, label), playbook) in result.profiles.iter().zip(&result.labels).zip(&result.playbooks) {
        println!("Cluster {}: {} ({} members)", profile.cluster, label, profile.count);
        if let Some(centroid) = result.centroid_in_units(profile.cluster) {
            let parts: Vec<String> = FEATURE_NAMES
                .iter()
                .zip(&centroid)
                .map(|(name, value)| format!("{} {:.1}", name, value))
                .collect();
            println!("  centroid: {}", parts.join(", "));
        }
        if !profile.is_empty() {
            println!(
                "  age {:.1}  income ${:.0}  savings ${:.0}  risk {:.2}",
                profile.age.mean,
                profile.annual_income.mean,
                profile.current_savings.mean,
                profile.risk_score.mean
            );
        }
        println!("  {}", playbook.description);
        for action in playbook.actions {
            println!("    - {}", action);
        }
    }
}

fn print_cluster_members(result: &SegmentationResult, members: &[MemberRecord], cluster: usize) {
    println!();
    println!("Members of cluster {}:", cluster);
    for m in members_in_cluster(result, members, cluster) {
        println!(
            "  {:<12} age {:>3}  savings ${:>12.0}",
            m.member_id,
            m.age.map_or("-".to_string(), |a| a.to_string()),
            m.current_savings.unwrap_or(0.0)
        );
    }
}

fn print_book(report: &BookReport) {
    println!(
        "{:<12} {:>7} {:>7} {:>7} {:>9}  Status",
        "Member", "Stocks", "Bonds", "Cash", "WR %"
    );
    for row in &report.members {
        println!(
            "{:<12} {:>7.1} {:>7.1} {:>7.1} {:>9.2}  {}",
            row.member_id,
            row.target.stocks,
            row.target.bonds,
            row.target.cash,
            row.withdrawal_rate * 100.0,
            row.status
        );
    }
    let d = &report.distribution;
    println!();
    println!(
        "Safe {}  Caution {}  Risky {}  (total {})",
        d.safe,
        d.caution,
        d.risky,
        d.total()
    );
}
