use yew::prelude::*;
use yew::TargetCast;
use wasm_bindgen::JsValue;
use web_sys::{HtmlInputElement, HtmlSelectElement};

use surebet::odds::{effective_odd, format_money, format_odd, AWAITING};
use surebet::{
    logging, BetLeg, CalculatorMode, CalculatorState, CashbackSolver, LegEdit, LegKind, ProfitClass,
    Settings, LEG_POOL_SIZE, MIN_ACTIVE_LEGS,
};

fn load_settings() -> Settings {
    let query = gloo::utils::window()
        .location()
        .search()
        .unwrap_or_else(|err: JsValue| {
            gloo::console::warn!("could not read query string", err);
            String::new()
        });
    match Settings::from_query(&query) {
        Ok(settings) => settings,
        Err(err) => {
            gloo::console::warn!(format!("ignoring settings: {err}"));
            Settings::default()
        }
    }
}

fn money(x: Option<f64>) -> String {
    x.map(|v| format!("$ {}", format_money(v))).unwrap_or_else(|| "—".into())
}

fn percent(x: Option<f64>) -> String {
    x.map(|v| format!("{:.2}%", v)).unwrap_or_else(|| "—".into())
}

fn class_of(x: Option<ProfitClass>) -> &'static str {
    x.map(ProfitClass::css).unwrap_or("muted")
}

type EditCallback = Callback<(usize, LegEdit)>;

fn text_edit(on_edit: &EditCallback, index: usize, make: fn(String) -> LegEdit) -> Callback<InputEvent> {
    let on_edit = on_edit.clone();
    Callback::from(move |e: InputEvent| {
        let target: HtmlInputElement = e.target_unchecked_into();
        on_edit.emit((index, make(target.value())));
    })
}

fn toggle_edit(on_edit: &EditCallback, index: usize, make: fn(bool) -> LegEdit) -> Callback<Event> {
    let on_edit = on_edit.clone();
    Callback::from(move |e: Event| {
        let target: HtmlInputElement = e.target_unchecked_into();
        on_edit.emit((index, make(target.checked())));
    })
}

#[derive(Properties, PartialEq)]
struct HouseCardProps {
    index: usize,
    leg: BetLeg,
    fixed: bool,
    can_fix: bool,
    show_fix: bool,
    on_edit: EditCallback,
    on_fix: Callback<usize>,
}

#[function_component(HouseCard)]
fn house_card(props: &HouseCardProps) -> Html {
    let HouseCardProps { index, leg, fixed, can_fix, show_fix, on_edit, on_fix } = props;
    let index = *index;
    let odd_text = format_odd(effective_odd(leg));

    let on_kind_change = {
        let on_edit = on_edit.clone();
        Callback::from(move |e: Event| {
            let target: HtmlSelectElement = e.target_unchecked_into();
            let kind = if target.selected_index() > 0 { LegKind::Lay } else { LegKind::Back };
            on_edit.emit((index, LegEdit::Kind(kind)));
        })
    };
    let on_fix_click = {
        let on_fix = on_fix.clone();
        Callback::from(move |_| on_fix.emit(index))
    };

    html! {
        <div class="card">
            <h2>
                <input
                    placeholder={format!("House {}", index + 1)}
                    value={leg.name.clone()}
                    oninput={text_edit(on_edit, index, LegEdit::Name)}
                    aria-label="House name" />
                { if *fixed {
                    html!{ <span class="status-indicator warning">{"Fixed"}</span> }
                } else { html!{} }}
            </h2>

            <div class="input-group">
                <label>{"Odd"}</label>
                <input
                    type="text"
                    placeholder={"e.g. 2.10"}
                    value={leg.raw_odd.clone()}
                    oninput={text_edit(on_edit, index, LegEdit::Odd)}
                    aria-label="Odd" />
                <div class="hint">{"Effective odd: "}{odd_text}</div>
            </div>

            <div class="row">
                <div class="input-group">
                    <label>{"Type"}</label>
                    <select onchange={on_kind_change} aria-label="Bet type">
                        { for LegKind::all().iter().map(|(k, name)| {
                            html!{ <option selected={*k == leg.kind}>{ *name }</option> }
                        })}
                    </select>
                </div>
                <div class="input-group">
                    <label class="tooltip" data-tooltip="Boost applied to the odd's profit">{"Boost (%)"}</label>
                    <input
                        type="number"
                        step="0.1"
                        value={leg.boost_pct.clone()}
                        oninput={text_edit(on_edit, index, LegEdit::Boost)}
                        aria-label="Boost percentage" />
                </div>
            </div>

            <div class="row">
                <div class="input-group">
                    <label class="tooltip" data-tooltip="Back: money staked. Lay: backer's stake">{"Value"}</label>
                    <input
                        type="number"
                        step="0.01"
                        value={leg.stake_value.clone()}
                        oninput={text_edit(on_edit, index, LegEdit::Value)}
                        aria-label="Stake value" />
                </div>
                { if leg.kind == LegKind::Lay {
                    html!{
                        <div class="input-group">
                            <label class="tooltip" data-tooltip="Money at risk on the exchange">{"Liability"}</label>
                            <input
                                type="number"
                                step="0.01"
                                value={leg.lay_liability.clone()}
                                oninput={text_edit(on_edit, index, LegEdit::Liability)}
                                aria-label="Lay liability" />
                        </div>
                    }
                } else { html!{} }}
            </div>

            <div class="input-group">
                <label class="tooltip" data-tooltip="Refunded if this house loses">{"Cashback (%)"}</label>
                <input
                    type="number"
                    step="0.1"
                    value={leg.cashback_pct.clone()}
                    oninput={text_edit(on_edit, index, LegEdit::Cashback)}
                    aria-label="Cashback percentage" />
            </div>

            <div class="row" style="align-items:center;">
                <label>
                    <input
                        type="checkbox"
                        checked={leg.commission_enabled}
                        onchange={toggle_edit(on_edit, index, LegEdit::CommissionEnabled)} />
                    {" Commission"}
                </label>
                { if leg.commission_enabled {
                    html!{
                        <input
                            type="number"
                            step="0.1"
                            placeholder="%"
                            value={leg.commission_pct.clone()}
                            oninput={text_edit(on_edit, index, LegEdit::Commission)}
                            aria-label="Commission percentage" />
                    }
                } else { html!{} }}
                <label>
                    <input
                        type="checkbox"
                        checked={leg.is_freebet}
                        onchange={toggle_edit(on_edit, index, LegEdit::Freebet)} />
                    {" Freebet"}
                </label>
            </div>

            { if *show_fix {
                html!{
                    <button
                        onclick={on_fix_click}
                        class={if *fixed { "warning" } else { "" }}
                        disabled={!*can_fix && !*fixed}
                        style="margin-top:8px; width: 100%;"
                        aria-label="Fix stake">
                        { if *fixed { "Stake fixed" } else { "Fix stake" } }
                    </button>
                }
            } else { html!{} }}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    settings: Settings,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let calc = use_state(|| CalculatorState::new(&props.settings));
    let mode = use_state(|| props.settings.mode);
    let investment = use_state(String::new);

    // Handlers
    let on_edit: EditCallback = {
        let calc = calc.clone();
        Callback::from(move |(index, edit): (usize, LegEdit)| {
            let mut next = (*calc).clone();
            if let Err(err) = next.edit_leg(index, edit) {
                gloo::console::warn!(err.to_string());
            }
            calc.set(next);
        })
    };
    let on_fix = {
        let calc = calc.clone();
        Callback::from(move |index: usize| {
            let mut next = (*calc).clone();
            if let Err(err) = next.toggle_fix(index) {
                gloo::console::warn!(err.to_string());
            }
            calc.set(next);
        })
    };
    let on_houses_change = {
        let calc = calc.clone();
        Callback::from(move |e: Event| {
            let target: HtmlSelectElement = e.target_unchecked_into();
            let n = target.selected_index().max(0) as usize + MIN_ACTIVE_LEGS;
            let mut next = (*calc).clone();
            if let Err(err) = next.set_num_active(n) {
                gloo::console::warn!(err.to_string());
            }
            calc.set(next);
        })
    };
    let on_solver_change = {
        let calc = calc.clone();
        Callback::from(move |e: Event| {
            let target: HtmlSelectElement = e.target_unchecked_into();
            let idx = target.selected_index().max(0) as usize;
            let solver = CashbackSolver::all().get(idx).map(|(s, _)| *s).unwrap_or_default();
            let mut next = (*calc).clone();
            next.set_solver(solver);
            calc.set(next);
        })
    };
    let on_investment_input = {
        let investment = investment.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            investment.set(target.value());
        })
    };
    let mode_button = |m: CalculatorMode, label: &'static str| {
        let mode = mode.clone();
        let active = *mode == m;
        let onclick = Callback::from(move |_| mode.set(m));
        html! {
            <button {onclick} class={if active { "warning" } else { "" }}>{label}</button>
        }
    };

    let show_fix = *mode == CalculatorMode::Cashback;
    let report = calc.report();
    let plan = calc.plan(&investment);

    html! {
        <div class="container">
            <header>
                <h1>{"Surebet"}</h1>
                <div class="row">
                    { for CalculatorMode::all().iter().map(|(m, label)| mode_button(*m, *label)) }
                </div>
            </header>

            <div class="row" style="align-items:end;">
                <div class="input-group">
                    <label>{"Houses"}</label>
                    <select onchange={on_houses_change} aria-label="Number of houses">
                        { for (MIN_ACTIVE_LEGS..=LEG_POOL_SIZE).map(|n| {
                            html!{ <option selected={n == calc.num_active()}>{ n.to_string() }</option> }
                        })}
                    </select>
                </div>
                { if show_fix {
                    html!{
                        <div class="input-group">
                            <label class="tooltip" data-tooltip="How cashback on several houses is balanced">{"Cashback solver"}</label>
                            <select onchange={on_solver_change} aria-label="Cashback solver">
                                { for CashbackSolver::all().iter().map(|(s, name)| {
                                    html!{ <option selected={*s == calc.solver()}>{ *name }</option> }
                                })}
                            </select>
                        </div>
                    }
                } else {
                    html!{
                        <div class="input-group">
                            <label>{"Total investment ($)"}</label>
                            <input
                                type="number"
                                placeholder={"e.g. 1000"}
                                value={(*investment).clone()}
                                oninput={on_investment_input}
                                aria-label="Total investment" />
                        </div>
                    }
                }}
            </div>

            <div class="grid">
                { for calc.active_legs().iter().enumerate().map(|(i, leg)| html!{
                    <HouseCard
                        index={i}
                        leg={leg.clone()}
                        fixed={calc.fixed_leg() == Some(i)}
                        can_fix={calc.can_fix(i)}
                        show_fix={show_fix}
                        on_edit={on_edit.clone()}
                        on_fix={on_fix.clone()} />
                })}
            </div>

            { if show_fix {
                let summary = &report.summary;
                html!{
                    <div class="card">
                        <h2>
                            <span>{"Stake distribution"}</span>
                            <span class={format!("status-indicator {}", class_of(summary.profit_class()))}>
                                { match summary.profit_class() {
                                    Some(ProfitClass::Positive) => "Profit",
                                    Some(ProfitClass::Negative) => "Loss",
                                    None => AWAITING,
                                }}
                            </span>
                        </h2>
                        <table>
                            <thead>
                                <tr>
                                    <th>{"House"}</th><th>{"Value"}</th><th>{"% of stake"}</th>
                                    <th>{"Liability"}</th><th>{"Cashback if loses"}</th>
                                    <th>{"Return"}</th><th>{"Profit"}</th>
                                </tr>
                            </thead>
                            <tbody>
                                { for report.rows.iter().map(|row| html!{
                                    <tr>
                                        <td>
                                            {&row.name}
                                            { if row.is_freebet { html!{ <span class="muted">{" (freebet)"}</span> } } else { html!{} } }
                                        </td>
                                        <td>{money(Some(row.value))}</td>
                                        <td>{format!("{:.2}%", row.share_pct)}</td>
                                        <td>{money(row.lay_liability)}</td>
                                        <td>{money(row.cashback_if_loses)}</td>
                                        <td>{money(row.return_if_wins)}</td>
                                        <td class={class_of(row.profit_class)}>{money(row.profit_if_wins)}</td>
                                    </tr>
                                })}
                            </tbody>
                        </table>
                        <div class="section-divider"></div>
                        <div class="metric-grid">
                            <div class="metric-item">
                                <div class="metric-value">{money(Some(summary.total_invested))}</div>
                                <div class="metric-label">{"Total invested"}</div>
                            </div>
                            <div class="metric-item">
                                <div class="metric-value">{money(summary.minimum_guaranteed_return)}</div>
                                <div class="metric-label">{"Guaranteed return"}</div>
                            </div>
                            <div class="metric-item">
                                <div class={format!("metric-value {}", class_of(summary.profit_class()))}>
                                    {money(summary.guaranteed_profit)}
                                </div>
                                <div class="metric-label">{"Guaranteed profit"}</div>
                            </div>
                            <div class="metric-item">
                                <div class={format!("metric-value {}", class_of(summary.profit_class()))}>
                                    {percent(summary.roi_pct)}
                                </div>
                                <div class="metric-label">{"ROI"}</div>
                            </div>
                        </div>
                    </div>
                }
            } else if let Some(plan) = plan {
                html!{
                    <div class="card">
                        <h2><span>{"Investment split"}</span></h2>
                        <table>
                            <thead>
                                <tr>
                                    <th>{"House"}</th><th>{"Odd"}</th><th>{"Value"}</th><th>{"%"}</th>
                                    <th>{"Liability"}</th><th>{"Return"}</th><th>{"Profit"}</th>
                                </tr>
                            </thead>
                            <tbody>
                                { for plan.rows.iter().map(|row| html!{
                                    <tr>
                                        <td>{&row.name}</td>
                                        <td>{format_odd(row.odd)}</td>
                                        <td>{money(Some(row.value))}</td>
                                        <td>{format!("{:.2}%", row.share_pct)}</td>
                                        <td>{money(row.lay_liability)}</td>
                                        <td>{money(Some(row.return_if_wins))}</td>
                                        <td class={ProfitClass::of(row.profit_if_wins).css()}>{money(Some(row.profit_if_wins))}</td>
                                    </tr>
                                })}
                            </tbody>
                        </table>
                        <div class="section-divider"></div>
                        <div class="metric-grid">
                            <div class="metric-item">
                                <div class="metric-value">{money(Some(plan.total_investment))}</div>
                                <div class="metric-label">{"Total investment"}</div>
                            </div>
                            <div class="metric-item">
                                <div class="metric-value">{money(Some(plan.min_return))}</div>
                                <div class="metric-label">{"Minimum return"}</div>
                            </div>
                            <div class="metric-item">
                                <div class={format!("metric-value {}", ProfitClass::of(plan.min_profit).css())}>
                                    {money(Some(plan.min_profit))}
                                </div>
                                <div class="metric-label">{"Minimum profit"}</div>
                            </div>
                            <div class="metric-item">
                                <div class={format!("metric-value {}", ProfitClass::of(plan.margin_pct).css())}>
                                    {percent(Some(plan.margin_pct))}
                                </div>
                                <div class="metric-label">{"Profit margin"}</div>
                            </div>
                        </div>
                    </div>
                }
            } else {
                html!{
                    <div class="hint" style="margin-top:12px;">
                        {"Enter a total investment and at least two odds to split it."}
                    </div>
                }
            }}

            <footer>
                {"Surebet v0.1 - Stake equalizer for arbitrage, cashback and freebet offers"}
            </footer>
        </div>
    }
}

fn main() {
    let settings = load_settings();
    match settings.log_level() {
        Ok(level) => {
            if let Err(err) = logging::init(level) {
                gloo::console::warn!(err.to_string());
            }
        }
        Err(err) => gloo::console::warn!(err.to_string()),
    }
    yew::Renderer::<App>::with_props(AppProps { settings }).render();
}
