use crate::auth::use_auth;
use leptos::prelude::*;

/// 面板顶栏：标题、当前用户和注销按钮
///
/// `children` 放在注销按钮之前，用于面板自己的操作按钮。
#[component]
pub fn Navbar(title: &'static str, #[prop(optional)] children: Option<Children>) -> impl IntoView {
    let auth = use_auth();
    let name = move || {
        auth.session
            .with(|s| s.as_ref().map(|s| s.display_name().to_string()))
            .unwrap_or_default()
    };
    let initial = move || {
        auth.session
            .with(|s| s.as_ref().map(|s| s.initial()))
            .unwrap_or('U')
            .to_string()
    };

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl">
            <div class="flex-1 gap-2">
                <a class="btn btn-ghost text-xl">{title}</a>
            </div>
            <div class="flex-none gap-2">
                {children.map(|c| c())}
                <div class="hidden md:flex items-center gap-2 px-2">
                    <div class="avatar placeholder">
                        <div class="bg-neutral text-neutral-content rounded-full w-8">
                            <span>{initial}</span>
                        </div>
                    </div>
                    <span class="text-sm">{name}</span>
                </div>
                <button on:click=move |_| auth.confirm_logout() class="btn btn-outline btn-error">
                    "Logout"
                </button>
            </div>
        </div>
    }
}
