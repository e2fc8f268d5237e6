use crate::auth::use_auth;
use crate::components::chat_overlay::ChatPanel;
use crate::components::idea_card::IdeaCard;
use crate::components::navbar::Navbar;
use ideahub::board::investor::{InvestorBoard, InvestorState};
use ideahub::chat::ConversationTarget;
use ideahub_shared::Id;
use ideahub_shared::protocol::IdeaFeed;
use leptos::prelude::*;
use leptos::task::spawn_local;

fn tab_label(feed: IdeaFeed) -> &'static str {
    match feed {
        IdeaFeed::All => "All Ideas",
        IdeaFeed::Liked => "Liked",
        IdeaFeed::Saved => "Saved",
    }
}

#[component]
pub fn InvestorDashboard() -> impl IntoView {
    let auth = use_auth();

    let board = InvestorBoard::new(auth.services().client.clone());
    let state = RwSignal::new(InvestorState::default());
    board.subscribe(move |next| state.set(next.clone()));
    let board = StoredValue::new_local(board);
    on_cleanup(move || {
        let _ = board.try_with_value(|b| b.unmount());
    });

    let chat_target = RwSignal::new(Option::<ConversationTarget>::None);

    {
        let board = board.get_value();
        spawn_local(async move {
            let _ = board.load().await;
        });
    }

    let switch_feed = move |feed: IdeaFeed| {
        let board = board.get_value();
        spawn_local(async move {
            let _ = board.switch_feed(feed).await;
        });
    };

    let search_category = move |_| {
        let board = board.get_value();
        let category = state.with_untracked(|s| s.filter.category.clone().unwrap_or_default());
        spawn_local(async move {
            let _ = board.search_by_category(&category).await;
        });
    };

    let toggle_like = move |id: Id| {
        let board = board.get_value();
        spawn_local(async move {
            let _ = board.toggle_like(&id).await;
        });
    };

    let toggle_save = move |id: Id| {
        let board = board.get_value();
        spawn_local(async move {
            let _ = board.toggle_save(&id).await;
        });
    };

    let has_filters = move || state.with(|s| s.filter.is_active());

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Navbar title="Investor Dashboard" />

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"Ideas"</div>
                        <div class="stat-value text-primary">{move || state.with(|s| s.ideas.len())}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Liked"</div>
                        <div class="stat-value text-error">{move || state.with(InvestorState::liked_count)}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Saved"</div>
                        <div class="stat-value text-secondary">{move || state.with(InvestorState::saved_count)}</div>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body gap-4">
                        <div role="tablist" class="tabs tabs-boxed w-fit">
                            {IdeaFeed::ALL
                                .into_iter()
                                .map(|feed| view! {
                                    <a
                                        role="tab"
                                        class=move || if state.with(|s| s.feed == feed) { "tab tab-active" } else { "tab" }
                                        on:click=move |_| switch_feed(feed)
                                    >
                                        {tab_label(feed)}
                                    </a>
                                })
                                .collect_view()}
                        </div>

                        <div class="flex flex-col md:flex-row gap-2">
                            <input
                                type="text"
                                placeholder="Search ideas..."
                                class="input input-bordered flex-1"
                                prop:value=move || state.with(|s| s.filter.search.clone())
                                on:input=move |ev| board.with_value(|b| b.set_search(event_target_value(&ev)))
                            />
                            <select
                                class="select select-bordered"
                                prop:value=move || state.with(|s| s.filter.category.clone().unwrap_or_default())
                                on:change=move |ev| board.with_value(|b| b.set_category(Some(event_target_value(&ev))))
                            >
                                <option value="">"All Categories"</option>
                                {move || state.with(|s| {
                                    s.categories()
                                        .into_iter()
                                        .map(|c| {
                                            let c = c.to_string();
                                            view! { <option value=c.clone()>{c}</option> }
                                        })
                                        .collect_view()
                                })}
                            </select>
                            <button class="btn btn-primary" on:click=search_category disabled=move || state.with(|s| s.loading)>
                                "Search"
                            </button>
                            <Show when=has_filters>
                                <button class="btn btn-ghost" on:click=move |_| board.with_value(|b| b.clear_filters())>
                                    "Clear"
                                </button>
                            </Show>
                        </div>
                    </div>
                </div>

                <Show when=move || state.with(|s| s.error.is_some())>
                    <div role="alert" class="alert alert-error">
                        <span>{move || state.with(|s| s.error.clone().unwrap_or_default())}</span>
                    </div>
                </Show>

                <Show when=move || state.with(|s| s.loading)>
                    <div class="flex justify-center py-12">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>
                <Show when=move || state.with(|s| !s.loading && s.visible().is_empty())>
                    <div class="text-center py-12">
                        <h3 class="text-lg font-semibold">"No ideas found"</h3>
                        <p class="text-base-content/50">{move || state.with(InvestorState::empty_message)}</p>
                    </div>
                </Show>

                <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3">
                    {move || state.with(|s| {
                        s.visible()
                            .into_iter()
                            .cloned()
                            .map(|idea| {
                                let like_id = idea.id.clone();
                                let save_id = idea.id.clone();
                                let liked = idea.liked_by_current_user;
                                let saved = idea.saved_by_current_user;
                                let chat = ConversationTarget::idea_owner(&idea);
                                view! {
                                    <IdeaCard idea=idea>
                                        <button
                                            class=if liked { "btn btn-sm btn-error" } else { "btn btn-sm btn-outline btn-error" }
                                            on:click=move |_| toggle_like(like_id.clone())
                                        >
                                            {if liked { "♥ Liked" } else { "♡ Like" }}
                                        </button>
                                        <button
                                            class=if saved { "btn btn-sm btn-secondary" } else { "btn btn-sm btn-outline btn-secondary" }
                                            on:click=move |_| toggle_save(save_id.clone())
                                        >
                                            {if saved { "Saved" } else { "Save" }}
                                        </button>
                                        {chat.map(|target| view! {
                                            <button class="btn btn-sm btn-outline btn-info" on:click=move |_| chat_target.set(Some(target.clone()))>
                                                "Chat"
                                            </button>
                                        })}
                                    </IdeaCard>
                                }
                            })
                            .collect_view()
                    })}
                </div>
            </div>

            <ChatPanel target=chat_target />
        </div>
    }
}
