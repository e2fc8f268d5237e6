//! 创意卡片
//!
//! 两个面板共用的展示部分；操作按钮由调用方通过 children 传入。

use ideahub_shared::Idea;
use leptos::prelude::*;

/// 预算的紧凑写法：1500 -> "1.5K"，2000000 -> "2.0M"
pub fn format_budget(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("{:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("{:.1}K", amount / 1_000.0)
    } else {
        format!("{}", amount)
    }
}

fn category_badge(category: &str) -> &'static str {
    match category {
        "Technology" => "badge badge-info",
        "Healthcare" => "badge badge-success",
        "Education" => "badge badge-secondary",
        "Finance" => "badge badge-warning",
        _ => "badge badge-ghost",
    }
}

#[component]
pub fn IdeaCard(idea: Idea, children: Children) -> impl IntoView {
    let badge = category_badge(&idea.category);
    let category = (!idea.category.is_empty()).then(|| idea.category.clone());
    let tags: Vec<String> = idea.tag_list().into_iter().map(str::to_string).collect();
    let budget = format_budget(idea.budget);
    let owner = idea.owner_name().to_string();

    view! {
        <div class="card bg-base-100 shadow-md hover:shadow-lg transition-shadow">
            <div class="card-body gap-3">
                <div class="flex items-start justify-between gap-2">
                    <h3 class="card-title text-lg">{idea.title}</h3>
                    {category.map(|c| view! { <span class=badge>{c}</span> })}
                </div>
                <p class="text-base-content/70 text-sm line-clamp-3">{idea.description}</p>
                <div class="flex flex-wrap gap-1">
                    {tags
                        .into_iter()
                        .map(|t| view! { <span class="badge badge-outline badge-sm">{t}</span> })
                        .collect_view()}
                </div>
                <div class="flex items-center justify-between text-sm text-base-content/60">
                    <span>"by " {owner}</span>
                    <span class="font-semibold text-primary">"$" {budget}</span>
                </div>
                <div class="card-actions justify-end">{children()}</div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_abbreviated_above_a_thousand() {
        assert_eq!(format_budget(950.0), "950");
        assert_eq!(format_budget(1500.0), "1.5K");
        assert_eq!(format_budget(2_000_000.0), "2.0M");
    }
}
