use chrono::NaiveDate;

use crate::aggregate::{AggregationResult, ProfitShares};
use crate::models::{Collaboration, ExpenseEntry, IncomeEntry, ReportPeriod};
use crate::report::format::{format_amount, format_currency, format_percentage, truncate};
use crate::report::layout::{Block, Document, PageGeometry, Paginator, TextStyle, Tone};

pub const EMPTY_PLACEHOLDER: &str = "No entries recorded";
pub const NO_PROFIT_NOTICE: &str = "No net profit to distribute for this period.";

const TITLE_ADVANCE: f32 = 15.0;
const PERIOD_ADVANCE: f32 = 20.0;
const HEADER_ADVANCE: f32 = 10.0;
const ROW_ADVANCE: f32 = 8.0;
const PLACEHOLDER_ADVANCE: f32 = 10.0;
const SECTION_GAP: f32 = 10.0;

// Column offsets from the left margin
const COL_DATE: f32 = 0.0;
const COL_SECOND: f32 = 30.0;
const COL_THIRD: f32 = 80.0;
const COL_AMOUNT: f32 = 130.0;

/// Everything the section builders read
pub struct DocumentInput<'a> {
    pub title: &'a str,
    pub currency_symbol: &'a str,
    pub period: &'a ReportPeriod,
    pub income: &'a [IncomeEntry],
    pub expenses: &'a [ExpenseEntry],
    pub collaborations: &'a [Collaboration],
    pub aggregation: &'a AggregationResult,
    pub generated_on: NaiveDate,
}

pub fn build_document(input: &DocumentInput<'_>, geometry: PageGeometry) -> Document {
    let mut pages = Paginator::new(geometry);

    pages.place(Block::text(TextStyle::Title, Tone::Neutral, input.title, TITLE_ADVANCE));
    pages.place(Block::text(
        TextStyle::Subtitle,
        Tone::Neutral,
        input.period.label(),
        PERIOD_ADVANCE,
    ));

    income_section(&mut pages, input.income);
    pages.gap(SECTION_GAP);
    expense_section(&mut pages, input.expenses);
    pages.gap(SECTION_GAP + 5.0);
    summary_section(&mut pages, input);
    pages.gap(SECTION_GAP);
    sharing_section(&mut pages, input);

    let generated = format!("Generated on {}", input.generated_on.format("%Y-%m-%d"));
    let page_column = geometry.width - 2.0 * geometry.margin - 25.0;
    pages.finish(|page, total| {
        vec![
            (0.0, generated.clone()),
            (page_column, format!("Page {page} of {total}")),
        ]
    })
}

fn section_header(title: &str, tone: Tone) -> Block {
    Block::text(TextStyle::SectionHeader, tone, title, HEADER_ADVANCE)
}

fn placeholder() -> Block {
    Block::text(TextStyle::Body, Tone::Neutral, EMPTY_PLACEHOLDER, PLACEHOLDER_ADVANCE)
}

fn table_header(columns: &[(f32, &str)]) -> Block {
    Block::row(
        TextStyle::TableHeader,
        Tone::Neutral,
        columns.iter().map(|(x, t)| (*x, t.to_string())).collect(),
        ROW_ADVANCE,
    )
}

fn body_row(cells: Vec<(f32, String)>) -> Block {
    Block::row(TextStyle::Body, Tone::Neutral, cells, ROW_ADVANCE)
}

/// Header, column titles and the first row go on one page; the rest flow.
fn table_section(pages: &mut Paginator, mut lead: Vec<Block>, header: Block, rows: Vec<Block>) {
    let mut rows = rows.into_iter();
    match rows.next() {
        Some(first) => {
            lead.push(header);
            lead.push(first);
            pages.keep_together(lead);
            for row in rows {
                pages.place(row);
            }
        }
        None => {
            lead.push(placeholder());
            pages.keep_together(lead);
        }
    }
}

fn income_section(pages: &mut Paginator, income: &[IncomeEntry]) {
    let header = table_header(&[
        (COL_DATE, "Date"),
        (COL_SECOND, "Job Title"),
        (COL_THIRD, "Client Name"),
        (COL_AMOUNT, "Amount"),
    ]);

    let rows = income
        .iter()
        .map(|e| {
            body_row(vec![
                (COL_DATE, e.date.format("%Y-%m-%d").to_string()),
                (COL_SECOND, truncate(&e.job_title, 25)),
                (COL_THIRD, truncate(&e.client_name, 25)),
                (COL_AMOUNT, format_amount(e.amount)),
            ])
        })
        .collect();

    table_section(
        pages,
        vec![section_header("Income Entries", Tone::Income)],
        header,
        rows,
    );
}

fn expense_section(pages: &mut Paginator, expenses: &[ExpenseEntry]) {
    let header = table_header(&[
        (COL_DATE, "Date"),
        (COL_SECOND, "Description"),
        (COL_AMOUNT, "Amount"),
    ]);

    let rows = expenses
        .iter()
        .map(|e| {
            body_row(vec![
                (COL_DATE, e.date.format("%Y-%m-%d").to_string()),
                (COL_SECOND, truncate(&e.title, 50)),
                (COL_AMOUNT, format_amount(e.amount)),
            ])
        })
        .collect();

    table_section(
        pages,
        vec![section_header("Expense Entries", Tone::Expense)],
        header,
        rows,
    );
}

fn summary_section(pages: &mut Paginator, input: &DocumentInput<'_>) {
    let totals = &input.aggregation.totals;
    let symbol = input.currency_symbol;
    let net_tone = if totals.net_profit >= 0.0 {
        Tone::Summary
    } else {
        Tone::Negative
    };

    pages.keep_together(vec![
        Block::text(TextStyle::SectionHeader, Tone::Summary, "Financial Summary", 15.0),
        Block::text(
            TextStyle::Summary,
            Tone::Income,
            format!("Total Income: {}", format_currency(totals.total_income, symbol)),
            ROW_ADVANCE,
        ),
        Block::text(
            TextStyle::Summary,
            Tone::Expense,
            format!("Total Expenses: {}", format_currency(totals.total_expenses, symbol)),
            ROW_ADVANCE,
        ),
        Block::text(
            TextStyle::Summary,
            net_tone,
            format!("Net Profit: {}", format_currency(totals.net_profit, symbol)),
            ROW_ADVANCE,
        ),
    ]);
}

fn sharing_section(pages: &mut Paginator, input: &DocumentInput<'_>) {
    let mut lead = vec![section_header("Profit Sharing", Tone::Sharing)];
    let mut rendered_any = false;

    for (collaboration, computed) in input
        .collaborations
        .iter()
        .zip(&input.aggregation.collaborations)
    {
        if !collaboration.has_named_members() {
            continue;
        }

        if rendered_any {
            pages.gap(4.0);
        }

        lead.push(Block::text(
            TextStyle::SubHeader,
            Tone::Neutral,
            collaboration_heading(collaboration),
            ROW_ADVANCE,
        ));

        let rows: Vec<Block> = match &computed.shares {
            ProfitShares::Distributed(shares) => shares
                .iter()
                .filter(|s| !s.name.is_empty())
                .map(|s| share_row(&s.name, s.share_percentage, format_amount(s.amount)))
                .collect(),
            ProfitShares::NoProfit => {
                lead.push(Block::text(
                    TextStyle::Notice,
                    Tone::Muted,
                    NO_PROFIT_NOTICE,
                    ROW_ADVANCE,
                ));
                collaboration
                    .named_members()
                    .map(|m| share_row(&m.display_name(), m.share_percentage, format_amount(0.0)))
                    .collect()
            }
        };

        let header = table_header(&[
            (COL_DATE, "Member"),
            (COL_THIRD, "Share %"),
            (COL_AMOUNT, "Profit Share"),
        ]);
        table_section(pages, std::mem::take(&mut lead), header, rows);
        rendered_any = true;
    }

    if !rendered_any {
        lead.push(placeholder());
        pages.keep_together(lead);
    }
}

fn collaboration_heading(collaboration: &Collaboration) -> String {
    match collaboration.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => {
            format!("{} ({})", collaboration.name, description)
        }
        _ => collaboration.name.clone(),
    }
}

fn share_row(name: &str, share_percentage: f64, amount: String) -> Block {
    body_row(vec![
        (COL_DATE, truncate(name, 40)),
        (COL_THIRD, format!("{}%", format_percentage(share_percentage))),
        (COL_AMOUNT, amount),
    ])
}
