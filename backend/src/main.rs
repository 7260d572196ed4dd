use moon::*;

// Serves the frontend bundle only. Code runs on the separate execution
// service the frontend posts to.
async fn frontend() -> Frontend {
    Frontend::new()
        .title("PeTTa Playground")
        .append_to_head(
            r#"
        <style>
            html, body, #app {
                height: 100%;
                margin: 0;
                background-color: #0f172a;
            }
        </style>"#,
        )
}

async fn up_msg_handler(_: UpMsgRequest<()>) {}

#[moon::main]
async fn main() -> std::io::Result<()> {
    start(frontend, up_msg_handler, |_| {}).await
}
