//! 浏览器视图模块
//!
//! 三个视图直接以内嵌HTML提供：护士站、医生诊室、公共显示屏。
//! 页面只做定时轮询和渲染，叫号按钮的禁用逻辑（当前有就诊中患者时
//! 不允许再次叫号）属于适配层的软性保护，引擎本身不做此限制。

use axum::{response::Html, routing::get, Router};

use crate::handlers::AppState;

/// 视图路由
pub fn view_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_page))
        .route("/secretary", get(secretary_page))
        .route("/doctor", get(doctor_page))
        .route("/display", get(display_page))
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn secretary_page() -> Html<&'static str> {
    Html(SECRETARY_HTML)
}

async fn doctor_page() -> Html<&'static str> {
    Html(DOCTOR_HTML)
}

async fn display_page() -> Html<&'static str> {
    Html(DISPLAY_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>门诊排队叫号系统</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            color: #333;
        }
        .container { max-width: 900px; margin: 0 auto; padding: 40px 20px; }
        .header { text-align: center; margin-bottom: 40px; color: white; }
        .header h1 { font-size: 2.5rem; margin-bottom: 10px; text-shadow: 0 2px 4px rgba(0,0,0,0.3); }
        .cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); gap: 20px; }
        .card {
            background: white; border-radius: 10px; padding: 30px;
            box-shadow: 0 10px 30px rgba(0,0,0,0.1); text-decoration: none; color: #333;
            transition: transform 0.3s ease;
        }
        .card:hover { transform: translateY(-5px); }
        .card h2 { color: #667eea; margin-bottom: 15px; }
        .card p { color: #666; line-height: 1.6; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>门诊排队叫号系统</h1>
            <p>8个诊室 · 挂号 · 叫号 · 公共显示</p>
        </div>
        <div class="cards">
            <a class="card" href="/ui/secretary">
                <h2>护士站</h2>
                <p>患者挂号登记与全部队列概览</p>
            </a>
            <a class="card" href="/ui/doctor">
                <h2>医生诊室</h2>
                <p>按诊室叫号、完成与取消就诊</p>
            </a>
            <a class="card" href="/ui/display">
                <h2>公共显示屏</h2>
                <p>候诊大厅脱敏叫号看板</p>
            </a>
        </div>
    </div>
</body>
</html>"#;

const SECRETARY_HTML: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>护士站 - 挂号登记</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f4f5f7; color: #333; }
        .container { max-width: 1000px; margin: 0 auto; padding: 20px; }
        h1 { margin-bottom: 20px; color: #444; }
        .panel { background: white; border-radius: 10px; padding: 20px; margin-bottom: 20px; box-shadow: 0 2px 8px rgba(0,0,0,0.08); }
        form { display: grid; grid-template-columns: 2fr 2fr 1fr auto; gap: 10px; align-items: end; }
        label { display: block; font-size: 0.85rem; color: #666; margin-bottom: 4px; }
        input, select { width: 100%; padding: 8px; border: 1px solid #ccc; border-radius: 5px; }
        button { padding: 9px 18px; background: #667eea; border: none; color: white; border-radius: 5px; cursor: pointer; }
        button:disabled { background: #aaa; cursor: not-allowed; }
        table { width: 100%; border-collapse: collapse; }
        th, td { text-align: left; padding: 8px 10px; border-bottom: 1px solid #eee; font-size: 0.9rem; }
        .counts { display: flex; gap: 16px; margin-bottom: 10px; color: #555; font-size: 0.9rem; }
        .msg { margin-top: 8px; font-size: 0.85rem; color: #c0392b; }
    </style>
</head>
<body>
    <div class="container">
        <h1>护士站</h1>
        <div class="panel">
            <form id="add-form">
                <div>
                    <label for="full_name">患者姓名</label>
                    <input id="full_name" required>
                </div>
                <div>
                    <label for="id_number">证件号</label>
                    <input id="id_number" required>
                </div>
                <div>
                    <label for="room">诊室</label>
                    <select id="room"></select>
                </div>
                <button id="submit" type="submit">挂号</button>
            </form>
            <div class="msg" id="msg"></div>
        </div>
        <div class="panel">
            <div class="counts" id="counts"></div>
            <table>
                <thead><tr><th>姓名</th><th>诊室</th><th>到达时间</th><th>状态</th></tr></thead>
                <tbody id="rows"></tbody>
            </table>
        </div>
    </div>
    <script>
        const STATUS_LABELS = { waiting: '候诊中', in_consultation: '就诊中', completed: '已完成', cancelled: '已取消' };
        const roomSelect = document.getElementById('room');
        for (let i = 1; i <= 8; i++) {
            roomSelect.add(new Option('诊室 ' + i, i));
        }

        async function loadPatients() {
            const resp = await fetch('/api/v1/patients');
            if (!resp.ok) return;
            const patients = await resp.json();

            const counts = {};
            for (const p of patients) counts[p.status] = (counts[p.status] || 0) + 1;
            document.getElementById('counts').innerHTML = Object.keys(STATUS_LABELS)
                .map(s => STATUS_LABELS[s] + ': ' + (counts[s] || 0))
                .join(' &nbsp;|&nbsp; ');

            document.getElementById('rows').innerHTML = patients.map(p =>
                '<tr><td>' + p.full_name + '</td><td>诊室 ' + p.consultation_room +
                '</td><td>' + new Date(p.arrival_time).toLocaleTimeString('zh-CN') +
                '</td><td>' + STATUS_LABELS[p.status] + '</td></tr>'
            ).join('');
        }

        document.getElementById('add-form').addEventListener('submit', async (e) => {
            e.preventDefault();
            const button = document.getElementById('submit');
            button.disabled = true;
            document.getElementById('msg').textContent = '';
            try {
                const resp = await fetch('/api/v1/patients', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({
                        full_name: document.getElementById('full_name').value,
                        id_number: document.getElementById('id_number').value,
                        consultation_room: parseInt(roomSelect.value, 10)
                    })
                });
                if (!resp.ok) {
                    const err = await resp.json();
                    document.getElementById('msg').textContent = err.message;
                } else {
                    e.target.reset();
                    await loadPatients();
                }
            } finally {
                button.disabled = false;
            }
        });

        loadPatients();
        setInterval(loadPatients, 10000);
    </script>
</body>
</html>"#;

const DOCTOR_HTML: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>医生诊室</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f4f5f7; color: #333; }
        .container { max-width: 800px; margin: 0 auto; padding: 20px; }
        h1 { margin-bottom: 20px; color: #444; }
        .panel { background: white; border-radius: 10px; padding: 20px; margin-bottom: 20px; box-shadow: 0 2px 8px rgba(0,0,0,0.08); }
        .rooms { display: flex; gap: 8px; flex-wrap: wrap; }
        .rooms button { padding: 8px 14px; border: 1px solid #667eea; background: white; color: #667eea; border-radius: 5px; cursor: pointer; }
        .rooms button.active { background: #667eea; color: white; }
        .current { font-size: 1.2rem; margin: 10px 0; }
        .actions button { padding: 9px 18px; margin-right: 8px; border: none; border-radius: 5px; cursor: pointer; color: white; }
        #call { background: #667eea; }
        #complete { background: #27ae60; }
        #cancel { background: #c0392b; }
        .actions button:disabled { background: #aaa; cursor: not-allowed; }
        ul { list-style: none; }
        li { padding: 8px 4px; border-bottom: 1px solid #eee; font-size: 0.9rem; }
        .hint { color: #888; font-size: 0.85rem; margin-top: 6px; }
    </style>
</head>
<body>
    <div class="container">
        <h1>医生诊室</h1>
        <div class="panel">
            <div class="rooms" id="rooms"></div>
        </div>
        <div class="panel">
            <div>当前就诊</div>
            <div class="current" id="current">无</div>
            <div class="actions">
                <button id="call">叫号</button>
                <button id="complete" disabled>完成就诊</button>
                <button id="cancel" disabled>取消就诊</button>
            </div>
            <div class="hint">有患者就诊中时叫号按钮不可用，请先完成或取消当前就诊。</div>
        </div>
        <div class="panel">
            <div id="waiting-title">候诊队列</div>
            <ul id="waiting"></ul>
        </div>
    </div>
    <script>
        let selectedRoom = 1;
        let currentPatient = null;

        const roomsDiv = document.getElementById('rooms');
        for (let i = 1; i <= 8; i++) {
            const button = document.createElement('button');
            button.textContent = '诊室 ' + i;
            button.addEventListener('click', () => { selectedRoom = i; render([]); loadRoom(); });
            roomsDiv.appendChild(button);
        }

        function render(patients) {
            for (let i = 0; i < roomsDiv.children.length; i++) {
                roomsDiv.children[i].classList.toggle('active', i + 1 === selectedRoom);
            }

            const waiting = patients.filter(p => p.status === 'waiting');
            currentPatient = patients.find(p => p.status === 'in_consultation') || null;

            document.getElementById('current').textContent =
                currentPatient ? currentPatient.full_name : '无';
            // 软性保护：就诊中患者未结束前禁止再次叫号
            document.getElementById('call').disabled = currentPatient !== null;
            document.getElementById('complete').disabled = currentPatient === null;
            document.getElementById('cancel').disabled = currentPatient === null;

            document.getElementById('waiting-title').textContent =
                '候诊队列（' + waiting.length + '人）';
            document.getElementById('waiting').innerHTML = waiting.map(p =>
                '<li>' + p.full_name + ' · ' +
                new Date(p.arrival_time).toLocaleTimeString('zh-CN') + '</li>'
            ).join('');
        }

        async function loadRoom() {
            const resp = await fetch('/api/v1/rooms/' + selectedRoom + '/patients');
            if (!resp.ok) return;
            render(await resp.json());
        }

        document.getElementById('call').addEventListener('click', async () => {
            await fetch('/api/v1/rooms/' + selectedRoom + '/call', { method: 'POST' });
            await loadRoom();
        });

        async function setStatus(status) {
            if (!currentPatient) return;
            await fetch('/api/v1/patients/' + currentPatient.id + '/status', {
                method: 'PUT',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ status })
            });
            await loadRoom();
        }
        document.getElementById('complete').addEventListener('click', () => setStatus('completed'));
        document.getElementById('cancel').addEventListener('click', () => setStatus('cancelled'));

        loadRoom();
        setInterval(loadRoom, 5000);
    </script>
</body>
</html>"#;

const DISPLAY_HTML: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>候诊显示屏</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: linear-gradient(135deg, #1e3c72 0%, #2a5298 100%);
            min-height: 100vh; color: white;
        }
        .container { max-width: 1400px; margin: 0 auto; padding: 20px; }
        .header { display: flex; justify-content: space-between; align-items: baseline; margin-bottom: 20px; }
        .header h1 { font-size: 2rem; }
        .summary { font-size: 1.1rem; opacity: 0.9; }
        #clock { font-size: 1.5rem; font-variant-numeric: tabular-nums; }
        .rooms { display: grid; grid-template-columns: repeat(4, 1fr); gap: 14px; }
        .room { background: rgba(255,255,255,0.08); border-radius: 10px; padding: 14px; }
        .room h2 { font-size: 1.2rem; margin-bottom: 10px; border-bottom: 1px solid rgba(255,255,255,0.2); padding-bottom: 6px; }
        .entry { padding: 6px 0; font-size: 1rem; }
        .entry .badge { display: inline-block; min-width: 64px; text-align: center; border-radius: 4px; padding: 2px 6px; margin-right: 8px; font-size: 0.85rem; }
        .in_consultation .badge { background: #27ae60; }
        .waiting .badge { background: rgba(255,255,255,0.25); }
        .empty { opacity: 0.5; font-size: 0.9rem; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>候诊显示屏</h1>
            <div class="summary" id="summary"></div>
            <div id="clock"></div>
        </div>
        <div class="rooms" id="rooms"></div>
    </div>
    <script>
        const STATUS_LABELS = { waiting: '候诊中', in_consultation: '就诊中' };

        function tick() {
            document.getElementById('clock').textContent =
                new Date().toLocaleTimeString('zh-CN');
        }

        async function loadDisplay() {
            const resp = await fetch('/api/v1/display');
            if (!resp.ok) return;
            const entries = await resp.json();

            const waitingCount = entries.filter(e => e.status === 'waiting').length;
            const busyCount = entries.filter(e => e.status === 'in_consultation').length;
            document.getElementById('summary').textContent =
                '候诊 ' + waitingCount + ' 人 · 就诊中 ' + busyCount + ' 人';

            let html = '';
            for (let room = 1; room <= 8; room++) {
                const inRoom = entries.filter(e => e.consultation_room === room);
                const items = inRoom.map(e =>
                    '<div class="entry ' + e.status + '"><span class="badge">' +
                    STATUS_LABELS[e.status] + '</span>' + e.full_name +
                    '（' + e.id_last_three + '）</div>'
                ).join('');
                html += '<div class="room"><h2>诊室 ' + room + '</h2>' +
                    (items || '<div class="empty">暂无患者</div>') + '</div>';
            }
            document.getElementById('rooms').innerHTML = html;
        }

        tick();
        setInterval(tick, 1000);
        loadDisplay();
        setInterval(loadDisplay, 3000);
    </script>
</body>
</html>"#;
