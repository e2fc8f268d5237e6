//! 会话浮层
//!
//! 面板只需写入 `target`：写入 Some 打开并加载历史，写入 None 关闭。
//! 消息列表随 `ChatState::revision` 自动滚动到底部。

use crate::auth::use_auth;
use ideahub::chat::{ChatOverlay, ChatState, ConversationTarget};
use ideahub_shared::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ChatPanel(target: RwSignal<Option<ConversationTarget>>) -> impl IntoView {
    let auth = use_auth();
    let role = auth.session.with_untracked(|s| s.as_ref().map(|s| s.role));
    let overlay = role.and_then(|role| ChatOverlay::for_role(auth.services().client.clone(), role));

    let Some(overlay) = overlay else {
        log::debug!("[Chat] No chat channel for {:?}.", role);
        return view! { <></> }.into_any();
    };
    let own_role = role.unwrap_or(Role::Entrepreneur);

    let state = RwSignal::new(overlay.state());
    overlay.subscribe(move |next| state.set(next.clone()));
    let overlay = StoredValue::new_local(overlay);
    on_cleanup(move || {
        let _ = overlay.try_with_value(|o| o.unmount());
    });

    Effect::new(move |_| match target.get() {
        Some(next) => {
            let chat = overlay.get_value();
            spawn_local(async move {
                let _ = chat.open(next).await;
            });
        }
        None => overlay.with_value(|o| o.close()),
    });

    let list_ref = NodeRef::<leptos::html::Div>::new();
    Effect::new(move |_| {
        state.with(|s| s.revision);
        if let Some(list) = list_ref.get() {
            list.set_scroll_top(list.scroll_height());
        }
    });

    let send = move || {
        let chat = overlay.get_value();
        spawn_local(async move {
            if let Err(e) = chat.send_draft().await {
                log::debug!("[Chat] Send skipped: {}", e);
            }
        });
    };

    let peer_name = move || {
        state.with(|s| s.target.as_ref().map(|t| t.peer_name.clone()).unwrap_or_default())
    };

    view! {
        <Show when=move || state.with(ChatState::is_open)>
            <div class="fixed bottom-4 right-4 z-40 w-96 max-w-[calc(100vw-2rem)]">
                <div class="card bg-base-100 shadow-2xl border border-base-300">
                    <div class="flex items-center justify-between px-4 py-3 border-b border-base-300">
                        <div class="flex items-center gap-2">
                            <div class="avatar placeholder">
                                <div class="bg-primary text-primary-content rounded-full w-8">
                                    <span>{move || peer_name().chars().next().unwrap_or('?').to_string()}</span>
                                </div>
                            </div>
                            <span class="font-semibold">{peer_name}</span>
                        </div>
                        <button class="btn btn-ghost btn-sm btn-circle" on:click=move |_| target.set(None)>
                            "✕"
                        </button>
                    </div>

                    <div node_ref=list_ref class="h-80 overflow-y-auto p-4 space-y-2">
                        <Show when=move || state.with(|s| s.loading)>
                            <div class="flex justify-center py-8">
                                <span class="loading loading-spinner text-primary"></span>
                            </div>
                        </Show>
                        <Show when=move || state.with(|s| !s.loading && s.messages.is_empty())>
                            <p class="text-center text-base-content/50 py-8">"No messages yet. Say hello!"</p>
                        </Show>
                        {move || state.with(|s| {
                            s.messages
                                .iter()
                                .map(|m| {
                                    let side = if m.sender_role == Some(own_role) { "chat chat-end" } else { "chat chat-start" };
                                    let bubble = if m.pending { "chat-bubble chat-bubble-primary opacity-60" } else if m.sender_role == Some(own_role) { "chat-bubble chat-bubble-primary" } else { "chat-bubble" };
                                    let time = m.timestamp.format("%H:%M").to_string();
                                    let content = m.content.clone();
                                    view! {
                                        <div class=side>
                                            <div class=bubble>{content}</div>
                                            <div class="chat-footer opacity-50 text-xs">{time}</div>
                                        </div>
                                    }
                                })
                                .collect_view()
                        })}
                    </div>

                    <Show when=move || state.with(|s| s.error.is_some())>
                        <div class="px-4">
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || state.with(|s| s.error.clone().unwrap_or_default())}</span>
                            </div>
                        </div>
                    </Show>

                    <div class="flex gap-2 p-4 border-t border-base-300">
                        <input
                            type="text"
                            placeholder="Type a message..."
                            class="input input-bordered flex-1"
                            prop:value=move || state.with(|s| s.draft.clone())
                            on:input=move |ev| overlay.with_value(|o| o.set_draft(event_target_value(&ev)))
                            on:keydown=move |ev: leptos::web_sys::KeyboardEvent| {
                                if ev.key() == "Enter" && !ev.shift_key() {
                                    ev.prevent_default();
                                    if state.with_untracked(ChatState::can_send) {
                                        send();
                                    }
                                }
                            }
                        />
                        <button
                            class="btn btn-primary"
                            disabled=move || !state.with(ChatState::can_send)
                            on:click=move |_| send()
                        >
                            {move || if state.with(|s| s.sending) {
                                view! { <span class="loading loading-spinner loading-sm"></span> }.into_any()
                            } else {
                                "Send".into_any()
                            }}
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
    .into_any()
}
