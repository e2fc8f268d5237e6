use crate::auth::use_auth;
use crate::components::chat_overlay::ChatPanel;
use crate::components::idea_card::IdeaCard;
use crate::components::idea_form::{FormState, IdeaFormDialog};
use crate::components::navbar::Navbar;
use ideahub::board::entrepreneur::{EntrepreneurBoard, EntrepreneurState};
use ideahub::chat::ConversationTarget;
use ideahub_shared::{Id, IdeaDraft};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn EntrepreneurDashboard() -> impl IntoView {
    let auth = use_auth();
    let services = auth.services();

    let board = EntrepreneurBoard::new(services.client.clone(), services.confirm.clone());
    let state = RwSignal::new(EntrepreneurState::default());
    board.subscribe(move |next| state.set(next.clone()));
    let board = StoredValue::new_local(board);
    on_cleanup(move || {
        let _ = board.try_with_value(|b| b.unmount());
    });

    let form = FormState::new();
    let dialog_open = RwSignal::new(false);
    let chat_target = RwSignal::new(Option::<ConversationTarget>::None);

    let load_ideas = move || {
        let board = board.get_value();
        spawn_local(async move {
            let _ = board.load().await;
        });
    };
    load_ideas();

    // 3秒后清除通知
    Effect::new(move |_| {
        if state.with(|s| s.notice.is_some()) {
            set_timeout(
                move || {
                    let _ = board.try_with_value(|b| b.dismiss_notice());
                },
                std::time::Duration::from_secs(3),
            );
        }
    });

    let open_create = move |_| {
        form.reset();
        dialog_open.set(true);
    };

    let open_edit = move |id: Id| {
        if let Some(idea) = board.with_value(|b| b.find(&id)) {
            form.fill(id, IdeaDraft::from_idea(&idea));
            dialog_open.set(true);
        }
    };

    let handle_submit = move |draft: IdeaDraft| {
        let board = board.get_value();
        let editing = form.editing.get_untracked();
        spawn_local(async move {
            let result = match editing {
                Some(id) => board.update(&id, &draft).await,
                None => board.create(&draft).await,
            };
            // 失败时保留表单内容，错误显示在面板上
            if result.is_ok() {
                dialog_open.set(false);
                form.reset();
            }
        });
    };

    let handle_delete = move |id: Id| {
        let board = board.get_value();
        spawn_local(async move {
            let _ = board.delete(&id).await;
        });
    };

    let total_ideas = move || state.with(|s| s.ideas.len());
    let categories = move || {
        state.with(|s| {
            let mut seen: Vec<&str> = s.ideas.iter().map(|i| i.category.as_str()).filter(|c| !c.is_empty()).collect();
            seen.sort_unstable();
            seen.dedup();
            seen.len()
        })
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <Show when=move || state.with(|s| s.notice.is_some())>
                    <div class="toast toast-top toast-end z-50">
                        <div class="alert alert-success shadow-lg">
                            <span>{move || state.with(|s| s.notice.clone().unwrap_or_default())}</span>
                        </div>
                    </div>
                </Show>

                <Navbar title="Entrepreneur Dashboard">
                    <button class="btn btn-primary" on:click=open_create>"+ New Idea"</button>
                </Navbar>

                <Show when=move || state.with(|s| s.error.is_some())>
                    <div role="alert" class="alert alert-error">
                        <span>{move || state.with(|s| s.error.clone().unwrap_or_default())}</span>
                        <button class="btn btn-ghost btn-sm" on:click=move |_| board.with_value(|b| b.dismiss_messages())>
                            "✕"
                        </button>
                    </div>
                </Show>

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"My Ideas"</div>
                        <div class="stat-value text-primary">{total_ideas}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Categories"</div>
                        <div class="stat-value text-secondary">{categories}</div>
                    </div>
                </div>

                <div class="flex items-center justify-between">
                    <h2 class="text-2xl font-bold">"My Ideas"</h2>
                    <button on:click=move |_| load_ideas() disabled=move || state.with(|s| s.loading) class="btn btn-ghost btn-sm">
                        "Refresh"
                    </button>
                </div>

                <Show when=move || state.with(|s| s.loading && s.ideas.is_empty())>
                    <div class="flex justify-center py-12">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>
                <Show when=move || state.with(|s| !s.loading && s.ideas.is_empty())>
                    <div class="text-center py-12 text-base-content/50">
                        "You haven't posted any ideas yet. Create your first one!"
                    </div>
                </Show>

                <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3">
                    {move || state.with(|s| {
                        s.ideas
                            .iter()
                            .cloned()
                            .map(|idea| {
                                let edit_id = idea.id.clone();
                                let delete_id = idea.id.clone();
                                let chat = ConversationTarget::interested_investor(&idea);
                                view! {
                                    <IdeaCard idea=idea>
                                        {chat.map(|target| view! {
                                            <button class="btn btn-sm btn-outline btn-info" on:click=move |_| chat_target.set(Some(target.clone()))>
                                                "Chat"
                                            </button>
                                        })}
                                        <button class="btn btn-sm btn-outline" on:click=move |_| open_edit(edit_id.clone())>
                                            "Edit"
                                        </button>
                                        <button class="btn btn-sm btn-outline btn-error" on:click=move |_| handle_delete(delete_id.clone())>
                                            "Delete"
                                        </button>
                                    </IdeaCard>
                                }
                            })
                            .collect_view()
                    })}
                </div>
            </div>

            <IdeaFormDialog
                form=form
                open=dialog_open
                saving=Signal::derive(move || state.with(|s| s.saving))
                on_submit=handle_submit
            />
            <ChatPanel target=chat_target />
        </div>
    }
}
