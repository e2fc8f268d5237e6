use crate::auth::use_auth;
use crate::web::router::Link;
use ideahub::RegisterOutcome;
use ideahub::route::AppRoute;
use ideahub_shared::{RegisterForm, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 可以自助注册的角色
const SELF_SERVICE_ROLES: [Role; 2] = [Role::Entrepreneur, Role::Investor];

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();

    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (role, set_role) = signal(Role::Entrepreneur);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        let services = auth.services();
        let form = RegisterForm {
            username: username.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            role: role.get_untracked(),
        };
        spawn_local(async move {
            match services.auth.register(form).await {
                Ok(RegisterOutcome::SignedIn(session)) => {
                    log::info!("[Register] Signed in as {}.", session.role);
                }
                Ok(RegisterOutcome::PendingLogin(message)) => {
                    auth.flash.set(Some(message.unwrap_or_else(|| {
                        "Registration successful! Please log in.".to_string()
                    })));
                }
                Err(e) => set_error_msg.set(Some(e.message().to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Join IdeaHub"</h1>
                    <p class="text-base-content/70">"Create your account"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="role">
                                <span class="label-text">"I am an"</span>
                            </label>
                            <select
                                id="role"
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    if let Ok(selected) = event_target_value(&ev).parse::<Role>() {
                                        set_role.set(selected);
                                    }
                                }
                            >
                                {SELF_SERVICE_ROLES
                                    .into_iter()
                                    .map(|r| view! {
                                        <option value=r.as_str() selected=move || role.get() == r>
                                            {r.as_str()}
                                        </option>
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already have an account? "
                            <Link to=AppRoute::Login class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
