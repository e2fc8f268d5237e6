//! 创意表单对话框
//!
//! 新建和编辑共用同一个对话框；是否处于编辑模式由 `FormState::editing` 决定。
//! 提交失败时对话框保持打开，输入内容不丢失。

mod form_state;

pub use form_state::FormState;

use ideahub_shared::IdeaDraft;
use leptos::prelude::*;

const CATEGORIES: [&str; 6] = [
    "Technology",
    "Healthcare",
    "Education",
    "Finance",
    "Entertainment",
    "Other",
];

#[component]
pub fn IdeaFormDialog(
    form: FormState,
    /// 对话框是否打开（由面板控制）
    open: RwSignal<bool>,
    #[prop(into)] saving: Signal<bool>,
    #[prop(into)] on_submit: Callback<IdeaDraft>,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    let is_editing = move || form.editing.with(Option::is_some);

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(form.to_draft());
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box max-w-2xl">
                <h3 class="font-bold text-lg">
                    {move || if is_editing() { "Edit Idea" } else { "Create New Idea" }}
                </h3>

                <form on:submit=submit class="space-y-4 mt-4">
                    <div class="form-control">
                        <label for="idea_title" class="label">
                            <span class="label-text">"Title *"</span>
                        </label>
                        <input id="idea_title" required
                            type="text"
                            placeholder="Enter your idea title"
                            on:input=move |ev| form.title.set(event_target_value(&ev))
                            prop:value=move || form.title.get()
                            class="input input-bordered w-full"
                        />
                    </div>

                    <div class="form-control">
                        <label for="idea_description" class="label">
                            <span class="label-text">"Description *"</span>
                        </label>
                        <textarea id="idea_description" required
                            rows="4"
                            placeholder="Describe your idea in detail"
                            on:input=move |ev| form.description.set(event_target_value(&ev))
                            prop:value=move || form.description.get()
                            class="textarea textarea-bordered w-full"
                        ></textarea>
                    </div>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="idea_category" class="label">
                                <span class="label-text">"Category"</span>
                            </label>
                            <select id="idea_category"
                                class="select select-bordered w-full"
                                on:change=move |ev| form.category.set(event_target_value(&ev))
                                prop:value=move || form.category.get()
                            >
                                <option value="">"Select a category"</option>
                                {CATEGORIES
                                    .into_iter()
                                    .map(|c| view! { <option value=c>{c}</option> })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form-control">
                            <label for="idea_budget" class="label">
                                <span class="label-text">"Budget ($)"</span>
                            </label>
                            <input id="idea_budget"
                                type="number" min="0" step="any"
                                placeholder="0"
                                on:input=move |ev| form.budget.set(event_target_value(&ev))
                                prop:value=move || form.budget.get()
                                class="input input-bordered w-full"
                            />
                        </div>
                    </div>

                    <div class="form-control">
                        <label for="idea_tags" class="label">
                            <span class="label-text">"Tags"</span>
                        </label>
                        <input id="idea_tags"
                            type="text"
                            placeholder="AI, Mobile, SaaS"
                            on:input=move |ev| form.tags.set(event_target_value(&ev))
                            prop:value=move || form.tags.get()
                            class="input input-bordered w-full"
                        />
                        <label class="label">
                            <span class="label-text-alt text-base-content/50">"Separate tags with commas"</span>
                        </label>
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>"Cancel"</button>
                        <button type="submit" disabled=move || saving.get() class="btn btn-primary">
                            {move || match (saving.get(), is_editing()) {
                                (true, _) => view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any(),
                                (false, true) => "Update Idea".into_any(),
                                (false, false) => "Create Idea".into_any(),
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
